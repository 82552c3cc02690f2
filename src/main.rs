use std::sync::Arc;

use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use sqlx::postgres::PgPoolOptions;
use tokio::main;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pantry::application::services::{
    dishes::DishService, storages::StorageService, users::UserService,
};
use pantry::config::Config;
use pantry::infrastructure::oauth::google::GoogleUserinfoClient;
use pantry::infrastructure::repositories::postgres::{
    PostgresDishRepository, PostgresStorageRepository, PostgresUserRepository,
};
use pantry::presentation::http::endpoints::{
    dishes::DishEndpoints, health::HealthEndpoints, root::ApiState, storages::StorageEndpoints,
    users::UserEndpoints,
};

#[main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::try_parse().map_err(anyhow::Error::msg)?;

    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_repo = PostgresUserRepository::new(pool.clone());
    let dish_repo = PostgresDishRepository::new(pool.clone());
    let storage_repo = PostgresStorageRepository::new(pool.clone());
    let provider = GoogleUserinfoClient::new(config.userinfo_url.clone(), config.call_timeout);

    let state = Arc::new(ApiState {
        user_service: Arc::new(UserService::new(user_repo, provider, config.call_timeout)),
        dish_service: Arc::new(DishService::new(dish_repo, storage_repo.clone())),
        storage_service: Arc::new(StorageService::new(storage_repo)),
    });

    let server_url = format!("http://{}:{}", config.host, config.port);
    info!(%server_url, "starting server");

    let api_service = OpenApiService::new(
        (
            HealthEndpoints,
            DishEndpoints::new(state.clone()),
            StorageEndpoints::new(state.clone()),
            UserEndpoints::new(state),
        ),
        "Pantry API",
        "0.1.0",
    )
    .server(format!("{server_url}/api"));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)))
        .run(app)
        .await?;
    Ok(())
}
