use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::errors::DomainResult;

/// Identity asserted by the external OAuth provider for one access token.
/// Ephemeral; never persisted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthIdentity {
    pub email: String,
    pub verified_email: bool,
    pub name: String,
}

impl OauthIdentity {
    /// Splits the provider-supplied display name into the first/last/full
    /// triple stored on the user record. The first whitespace-separated token
    /// is the first name, the remainder the last name.
    pub fn decompose_name(&self) -> (String, String, String) {
        let full = self.name.trim().to_string();
        let mut parts = full.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last, full)
    }
}

/// Port to the external userinfo endpoint; exchanges a bearer access token for
/// the identity it belongs to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn fetch_identity(&self, access_token: &str) -> DomainResult<OauthIdentity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_a_two_part_name() {
        let identity = OauthIdentity {
            email: "a@b.com".to_string(),
            verified_email: true,
            name: "Ada Lovelace".to_string(),
        };
        let (first, last, full) = identity.decompose_name();
        assert_eq!(first, "Ada");
        assert_eq!(last, "Lovelace");
        assert_eq!(full, "Ada Lovelace");
    }

    #[test]
    fn keeps_extra_tokens_in_the_last_name() {
        let identity = OauthIdentity {
            email: "a@b.com".to_string(),
            verified_email: true,
            name: "Jean Luc Picard".to_string(),
        };
        let (first, last, _) = identity.decompose_name();
        assert_eq!(first, "Jean");
        assert_eq!(last, "Luc Picard");
    }

    #[test]
    fn tolerates_an_empty_name() {
        let identity = OauthIdentity {
            email: "a@b.com".to_string(),
            verified_email: true,
            name: String::new(),
        };
        let (first, last, full) = identity.decompose_name();
        assert!(first.is_empty());
        assert!(last.is_empty());
        assert!(full.is_empty());
    }
}
