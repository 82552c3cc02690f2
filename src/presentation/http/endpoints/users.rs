use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    mappers::{map_error, map_user},
    requests::AlexaLinkDto,
    responses::UserDto,
    security::TokenAuth,
};

#[derive(Clone)]
pub struct UserEndpoints {
    state: Arc<ApiState>,
}

impl UserEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl UserEndpoints {
    /// The identity the bearer token resolves to; a first call with a fresh
    /// verified identity provisions the user record as a side effect.
    #[oai(path = "/users/me", method = "get", tag = EndpointsTags::Users)]
    pub async fn me(&self, auth: TokenAuth) -> poem::Result<Json<UserDto>> {
        let user = auth.resolve(&self.state).await?;
        Ok(Json(map_user(&user)))
    }

    #[oai(path = "/users/me/alexa", method = "put", tag = EndpointsTags::Users)]
    pub async fn link_alexa(
        &self,
        auth: TokenAuth,
        request: Json<AlexaLinkDto>,
    ) -> poem::Result<Json<UserDto>> {
        let user = auth.resolve(&self.state).await?;
        let updated = self
            .state
            .user_service
            .update_alexa_id(&user, &request.0.alexa_user_id)
            .await
            .map_err(map_error)?;
        Ok(Json(map_user(&updated)))
    }
}
