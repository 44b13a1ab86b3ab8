//! Credential lifecycle: load, refresh when stale, authorize when missing,
//! persist whatever was newly obtained.

use calgate_core::AuthError;

use crate::oauth::AuthProvider;
use crate::storage::{CredentialStore, TokenSet};

/// Return a usable token, refreshing or re-authorizing through `provider`
/// when the stored one is missing or about to expire.
///
/// # Errors
///
/// Storage failures and a failed authorization are returned as-is. A failed
/// refresh is logged and falls through to authorization.
#[tracing::instrument(skip_all, level = "info")]
pub async fn acquire_credentials<S, P>(store: &S, provider: &P) -> Result<TokenSet, AuthError>
where
    S: CredentialStore,
    P: AuthProvider,
{
    let stored = store.load()?;

    if let Some(token) = &stored {
        if !token.needs_refresh() {
            tracing::debug!("Using stored credentials");
            return Ok(token.clone());
        }
    }

    if let Some(refresh_token) = stored.as_ref().and_then(|t| t.refresh_token.as_deref()) {
        match provider.refresh(refresh_token).await {
            Ok(token) => {
                store.save(&token)?;
                tracing::info!("Refreshed stored credentials");
                return Ok(token);
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, re-authorizing: {}", e);
            }
        }
    }

    tracing::info!("No usable credentials, starting authorization");
    let token = provider.authorize().await?;
    store.save(&token)?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryStore {
        token: RefCell<Option<TokenSet>>,
        saves: Cell<usize>,
    }

    impl CredentialStore for MemoryStore {
        fn load(&self) -> Result<Option<TokenSet>, AuthError> {
            Ok(self.token.borrow().clone())
        }

        fn save(&self, token: &TokenSet) -> Result<(), AuthError> {
            *self.token.borrow_mut() = Some(token.clone());
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    struct FakeProvider {
        refresh_ok: bool,
        authorize_ok: bool,
        refreshes: Cell<usize>,
        authorizations: Cell<usize>,
    }

    impl FakeProvider {
        fn new(refresh_ok: bool, authorize_ok: bool) -> Self {
            Self {
                refresh_ok,
                authorize_ok,
                refreshes: Cell::new(0),
                authorizations: Cell::new(0),
            }
        }
    }

    impl AuthProvider for FakeProvider {
        async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
            self.refreshes.set(self.refreshes.get() + 1);
            if self.refresh_ok {
                Ok(token("refreshed", Some(refresh_token), 3600))
            } else {
                Err(AuthError::OAuthFailed("invalid_grant".to_string()))
            }
        }

        async fn authorize(&self) -> Result<TokenSet, AuthError> {
            self.authorizations.set(self.authorizations.get() + 1);
            if self.authorize_ok {
                Ok(token("authorized", Some("new_refresh"), 3600))
            } else {
                Err(AuthError::OAuthCancelled)
            }
        }
    }

    fn token(access: &str, refresh: Option<&str>, expires_in: i64) -> TokenSet {
        TokenSet {
            access_token: access.to_string(),
            refresh_token: refresh.map(|s| s.to_string()),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
            scopes: vec![],
        }
    }

    #[tokio::test]
    async fn test_valid_token_is_used_as_is() {
        let store = MemoryStore::default();
        store.save(&token("stored", Some("rt"), 3600)).unwrap();
        let provider = FakeProvider::new(true, true);

        let result = acquire_credentials(&store, &provider).await.unwrap();

        assert_eq!(result.access_token, "stored");
        assert_eq!(provider.refreshes.get(), 0);
        assert_eq!(provider.authorizations.get(), 0);
        assert_eq!(store.saves.get(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_saved() {
        let store = MemoryStore::default();
        store.save(&token("stale", Some("rt"), -60)).unwrap();
        let provider = FakeProvider::new(true, true);

        let result = acquire_credentials(&store, &provider).await.unwrap();

        assert_eq!(result.access_token, "refreshed");
        assert_eq!(result.refresh_token.as_deref(), Some("rt"));
        assert_eq!(store.load().unwrap().unwrap().access_token, "refreshed");
        assert_eq!(provider.authorizations.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_token_triggers_authorization() {
        let store = MemoryStore::default();
        let provider = FakeProvider::new(true, true);

        let result = acquire_credentials(&store, &provider).await.unwrap();

        assert_eq!(result.access_token, "authorized");
        assert_eq!(provider.refreshes.get(), 0);
        assert_eq!(store.saves.get(), 1);
        assert!(store.is_valid());
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_authorization() {
        let store = MemoryStore::default();
        store.save(&token("stale", Some("revoked"), -60)).unwrap();
        let provider = FakeProvider::new(false, true);

        let result = acquire_credentials(&store, &provider).await.unwrap();

        assert_eq!(result.access_token, "authorized");
        assert_eq!(provider.refreshes.get(), 1);
        assert_eq!(provider.authorizations.get(), 1);
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_authorizes() {
        let store = MemoryStore::default();
        store.save(&token("stale", None, -60)).unwrap();
        let provider = FakeProvider::new(true, true);

        let result = acquire_credentials(&store, &provider).await.unwrap();

        assert_eq!(result.access_token, "authorized");
        assert_eq!(provider.refreshes.get(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_authorization_is_error() {
        let store = MemoryStore::default();
        let provider = FakeProvider::new(true, false);

        let err = acquire_credentials(&store, &provider).await.unwrap_err();

        assert!(matches!(err, AuthError::OAuthCancelled));
        assert!(store.load().unwrap().is_none());
    }
}
