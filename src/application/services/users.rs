use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::services::identity::{IdentityProvider, OauthIdentity};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{USER_DATE_FORMAT, User};
use crate::domain::repositories::UserRepository;

/// Resolves bearer access tokens to local users, provisioning a user record on
/// the first successful verified-identity resolution for an email.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    provider: Arc<dyn IdentityProvider>,
    call_timeout: Duration,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        provider: Arc<dyn IdentityProvider>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            provider,
            call_timeout,
        }
    }

    /// Bounds an external call (provider or repository) by the configured
    /// deadline so a slow collaborator cannot pin a worker.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = DomainResult<T>> + Send,
    ) -> DomainResult<T> {
        match timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Canceled(
                "external call exceeded the configured deadline".to_string(),
            )),
        }
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<User> {
        self.bounded(self.repo.get(id)).await.map_err(|err| match err {
            DomainError::NotFound(_) | DomainError::Canceled(_) => err,
            _ => DomainError::Internal(format!("could not get user {id}")),
        })
    }

    pub async fn get_by_email(&self, email: &str) -> DomainResult<User> {
        self.bounded(self.repo.get_by_email(email))
            .await
            .map_err(|err| match err {
                DomainError::NotFound(_) | DomainError::Canceled(_) => err,
                _ => DomainError::Internal(format!("could not get user by email {email}")),
            })
    }

    pub async fn get_by_alexa_id(&self, alexa_id: &str) -> DomainResult<User> {
        self.bounded(self.repo.get_by_alexa(alexa_id))
            .await
            .map_err(|err| match err {
                DomainError::NotFound(_) | DomainError::Canceled(_) => err,
                _ => DomainError::Internal("could not get user by alexa id".to_string()),
            })
    }

    /// Identity resolution protocol: verify the token with the external
    /// provider, gate on the verified-email flag, then match or provision a
    /// local user keyed solely on the verified email.
    pub async fn get_by_access_token(&self, access_token: &str) -> DomainResult<User> {
        let identity = self
            .bounded(self.provider.fetch_identity(access_token))
            .await
            .map_err(|err| match err {
                DomainError::Canceled(_) => err,
                _ => DomainError::Internal("could not verify identity".to_string()),
            })?;

        // The sole authorization gate: no verified email, no access.
        if !identity.verified_email {
            warn!(email = %identity.email, "rejected unverified identity");
            return Err(DomainError::BadRequest(
                "not authorized, unverified email".to_string(),
            ));
        }

        match self.bounded(self.repo.get_by_email(&identity.email)).await {
            Ok(user) if user.user_id > 0 => Ok(user),
            Err(DomainError::NotFound(_)) => self.create(&identity, access_token, "").await,
            Err(err @ DomainError::Canceled(_)) => Err(err),
            _ => Err(DomainError::Internal(
                "could not verify user after lookup".to_string(),
            )),
        }
    }

    /// Provisions a user from a verified identity. The write is a conditional
    /// insert keyed on email, so two concurrent first-time logins for the same
    /// identity converge on a single row.
    pub async fn create(
        &self,
        identity: &OauthIdentity,
        access_token: &str,
        refresh_token: &str,
    ) -> DomainResult<User> {
        let (first_name, last_name, full_name) = identity.decompose_name();
        let user = User {
            user_id: 0,
            email: identity.email.clone(),
            first_name,
            last_name,
            full_name,
            created_date: Utc::now().format(USER_DATE_FORMAT).to_string(),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            alexa_user_id: String::new(),
            admin: false,
            temp_match: Uuid::new_v4().to_string(),
        };

        let created = self.bounded(self.repo.create_if_absent(&user)).await?;
        info!(user_id = created.user_id, email = %created.email, "provisioned user");
        Ok(created)
    }

    /// Replaces only the Alexa linkage, round-tripping every other field.
    pub async fn update_alexa_id(&self, user: &User, alexa_id: &str) -> DomainResult<User> {
        let mut updated = user.clone();
        updated.alexa_user_id = alexa_id.to_string();
        self.bounded(self.repo.update(&updated)).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::infrastructure::repositories::in_memory::InMemoryUserRepository;

    const TIMEOUT: Duration = Duration::from_secs(2);

    struct StubProvider {
        response: DomainResult<OauthIdentity>,
    }

    impl StubProvider {
        fn verified(email: &str, name: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(OauthIdentity {
                    email: email.to_string(),
                    verified_email: true,
                    name: name.to_string(),
                }),
            })
        }

        fn unverified(email: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(OauthIdentity {
                    email: email.to_string(),
                    verified_email: false,
                    name: "Some Body".to_string(),
                }),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                response: Err(DomainError::Internal("connection refused".to_string())),
            })
        }
    }

    #[async_trait]
    impl IdentityProvider for StubProvider {
        async fn fetch_identity(&self, _access_token: &str) -> DomainResult<OauthIdentity> {
            match &self.response {
                Ok(identity) => Ok(identity.clone()),
                Err(DomainError::Internal(msg)) => Err(DomainError::Internal(msg.clone())),
                Err(_) => unreachable!(),
            }
        }
    }

    fn service(
        repo: Arc<InMemoryUserRepository>,
        provider: Arc<dyn IdentityProvider>,
    ) -> UserService {
        UserService::new(repo, provider, TIMEOUT)
    }

    #[tokio::test]
    async fn first_resolution_provisions_exactly_one_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = service(repo.clone(), StubProvider::verified("ada@example.com", "Ada Lovelace"));

        let first = svc.get_by_access_token("tok-1").await.unwrap();
        assert!(first.user_id > 0);
        assert_eq!(first.email, "ada@example.com");
        assert_eq!(first.first_name, "Ada");
        assert_eq!(first.last_name, "Lovelace");

        let second = svc.get_by_access_token("tok-2").await.unwrap();
        assert_eq!(second.user_id, first.user_id);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn unverified_email_is_rejected_without_a_write() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = service(repo.clone(), StubProvider::unverified("a@b.com"));

        let err = svc.get_by_access_token("tok").await.unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));

        let lookup = svc.get_by_email("a@b.com").await.unwrap_err();
        assert!(lookup.is_not_found());
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn unreachable_provider_maps_to_internal() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = service(repo, StubProvider::unreachable());

        let err = svc.get_by_access_token("tok").await.unwrap_err();
        match err {
            DomainError::Internal(msg) => assert!(msg.contains("could not verify identity")),
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn created_user_round_trips_by_id() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = service(repo, StubProvider::verified("grace@example.com", "Grace Hopper"));

        let identity = OauthIdentity {
            email: "grace@example.com".to_string(),
            verified_email: true,
            name: "Grace Hopper".to_string(),
        };
        let created = svc.create(&identity, "access", "refresh").await.unwrap();
        let fetched = svc.get_by_id(created.user_id).await.unwrap();

        assert_eq!(fetched.email, created.email);
        assert_eq!(fetched.full_name, "Grace Hopper");
        assert_eq!(fetched.access_token, "access");
        assert_eq!(fetched.refresh_token, "refresh");
    }

    #[tokio::test]
    async fn update_alexa_id_touches_only_the_linkage() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = service(repo, StubProvider::verified("ada@example.com", "Ada Lovelace"));

        let user = svc.get_by_access_token("tok").await.unwrap();
        let updated = svc.update_alexa_id(&user, "amzn1.ask.account.X").await.unwrap();

        assert_eq!(updated.alexa_user_id, "amzn1.ask.account.X");
        let fetched = svc.get_by_id(user.user_id).await.unwrap();
        assert_eq!(fetched.alexa_user_id, "amzn1.ask.account.X");
        assert_eq!(fetched.email, user.email);
        assert_eq!(fetched.created_date, user.created_date);
        assert_eq!(fetched.access_token, user.access_token);
    }

    #[tokio::test]
    async fn alexa_lookup_distinguishes_not_found() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = service(repo, StubProvider::verified("ada@example.com", "Ada"));

        let err = svc.get_by_alexa_id("amzn1.ask.account.MISSING").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn concurrent_first_logins_converge_on_one_row() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let svc = Arc::new(service(
            repo.clone(),
            StubProvider::verified("race@example.com", "Race Condition"),
        ));

        let a = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.get_by_access_token("tok-a").await })
        };
        let b = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.get_by_access_token("tok-b").await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(repo.len().await, 1);
    }
}
