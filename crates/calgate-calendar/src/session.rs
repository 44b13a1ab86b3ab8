//! Building an authenticated gateway at startup.

use calgate_auth::{acquire_credentials, AuthProvider, CredentialStore, TokenSet};
use calgate_core::Config;

use crate::client::CalendarClient;
use crate::error::CalendarError;
use crate::gateway::CalendarGateway;
use crate::store::ConfigStore;

/// Authenticated client for the configured API endpoint.
pub fn build_client(token: &TokenSet, config: &Config) -> CalendarClient {
    CalendarClient::with_base_url(&token.access_token, &config.calendar.api_base_url)
}

/// Acquire credentials and assemble a gateway over the live API.
///
/// # Errors
///
/// `AuthRequired` when no usable credential could be obtained; credential
/// storage failures as `Auth`.
pub async fn connect<S, P, C>(
    credentials: &S,
    provider: &P,
    config: &Config,
    config_store: C,
) -> Result<CalendarGateway<CalendarClient, C>, CalendarError>
where
    S: CredentialStore,
    P: AuthProvider,
    C: ConfigStore,
{
    let token = acquire_credentials(credentials, provider).await?;
    let client = build_client(&token, config);

    tracing::info!("Connected to {}", config.calendar.api_base_url);
    Ok(CalendarGateway::new(client, config_store).with_time_zone(&config.calendar.time_zone))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use calgate_auth::FileCredentialStore;
    use calgate_core::AuthError;

    struct NoBrowser;

    impl AuthProvider for NoBrowser {
        async fn refresh(&self, _refresh_token: &str) -> Result<TokenSet, AuthError> {
            Err(AuthError::OAuthFailed("offline".to_string()))
        }

        async fn authorize(&self) -> Result<TokenSet, AuthError> {
            Err(AuthError::OAuthCancelled)
        }
    }

    #[tokio::test]
    async fn test_connect_without_credentials_requires_auth() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::at(dir.path().join("google.json"));
        let config = Config::default();

        let result = connect(&store, &NoBrowser, &config, config.clone()).await;

        assert!(matches!(result, Err(CalendarError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_connect_with_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::at(dir.path().join("google.json"));
        store
            .save(&TokenSet {
                access_token: "stored".to_string(),
                refresh_token: None,
                expires_at: chrono::Utc::now().timestamp() + 3600,
                scopes: vec![],
            })
            .unwrap();
        let mut config = Config::default();
        config.calendar.time_zone = "Europe/Berlin".to_string();

        let gateway = connect(&store, &NoBrowser, &config, config.clone())
            .await
            .unwrap();

        assert_eq!(gateway.time_zone(), "Europe/Berlin");
    }
}
