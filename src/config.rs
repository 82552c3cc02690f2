use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

const DEFAULT_CALL_TIMEOUT_SECS: u64 = 10;

pub struct Config {
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub userinfo_url: String,
    /// Deadline applied to the userinfo exchange and to repository calls made
    /// on the identity-resolution path.
    pub call_timeout: Duration,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        let call_timeout_secs = match var("EXTERNAL_CALL_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| "An error occured while parsing EXTERNAL_CALL_TIMEOUT_SECS env param")?,
            Err(_) => DEFAULT_CALL_TIMEOUT_SECS,
        };

        Ok(Config {
            port: var("PORT")
                .map_err(|_| "An error occured while getting PORT env param")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param")?,
            host: var("HOST").map_err(|_| "An error occured while getting HOST env param")?,
            database_url: var("DATABASE_URL")
                .map_err(|_| "An error occured while getting DATABASE_URL env param")?,
            userinfo_url: var("OAUTH_USERINFO_URL")
                .map_err(|_| "An error occured while getting OAUTH_USERINFO_URL env param")?,
            call_timeout: Duration::from_secs(call_timeout_secs),
        })
    }
}
