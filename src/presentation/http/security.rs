use poem::Result as PoemResult;
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

use crate::domain::models::User;
use crate::presentation::http::endpoints::root::ApiState;
use crate::presentation::http::mappers::map_error;

/// Bearer access token issued by the external OAuth provider. Every request
/// carrying one goes through the identity resolver before anything else.
#[derive(SecurityScheme)]
#[oai(ty = "bearer")]
pub struct TokenAuth(pub Bearer);

impl TokenAuth {
    /// Resolves the token to a local user, provisioning one on first sight of
    /// a verified identity.
    pub async fn resolve(self, state: &ApiState) -> PoemResult<User> {
        state
            .user_service
            .get_by_access_token(&self.0.token)
            .await
            .map_err(map_error)
    }
}
