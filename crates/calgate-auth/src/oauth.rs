use calgate_core::{AuthError, GoogleConfig};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use warp::Filter;

use crate::google::GoogleOAuth2Provider;
use crate::storage::TokenSet;

/// Source of fresh credentials
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    /// Trade a refresh token for a new token set
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError>;

    /// Run the interactive authorization flow
    async fn authorize(&self) -> Result<TokenSet, AuthError>;
}

type CallbackSender = Arc<Mutex<Option<oneshot::Sender<(String, String)>>>>;

/// Google sign-in through the system browser and a local callback server
pub struct GoogleAuth {
    provider: GoogleOAuth2Provider,
    port: u16,
}

impl GoogleAuth {
    pub fn new(provider: GoogleOAuth2Provider, port: u16) -> Self {
        Self { provider, port }
    }

    pub fn from_config(config: &GoogleConfig) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Self::new(
            GoogleOAuth2Provider::new(config.client_id.clone(), config.client_secret.clone()),
            config.redirect_port,
        ))
    }

    /// Serve `/callback` once and hand back `(code, state)`
    async fn wait_for_callback(&self, auth_url: &str) -> Result<(String, String), AuthError> {
        let (tx, rx) = oneshot::channel();
        let tx: CallbackSender = Arc::new(Mutex::new(Some(tx)));

        let routes = warp::get()
            .and(warp::path("callback"))
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::any().map(move || tx.clone()))
            .and_then(|params: HashMap<String, String>, tx: CallbackSender| async move {
                let code = params.get("code").cloned().unwrap_or_default();
                let state = params.get("state").cloned().unwrap_or_default();

                if let Some(sender) = tx.lock().await.take() {
                    let _ = sender.send((code, state));
                }

                Ok::<_, warp::Rejection>(warp::reply::html(
                    "<html><body><h1>Authorization successful!</h1><p>You can close this window.</p></body></html>",
                ))
            });

        let (_addr, server) = warp::serve(routes)
            .try_bind_ephemeral(([127, 0, 0, 1], self.port))
            .map_err(|_| AuthError::PortInUse(self.port))?;
        let server = tokio::spawn(server);

        let opened = webbrowser::open(auth_url);
        if let Err(e) = opened {
            tracing::warn!("Failed to open browser ({}); visit the URL manually", e);
        }

        let received = rx.await.map_err(|_| AuthError::OAuthCancelled);
        server.abort();
        received
    }
}

impl AuthProvider for GoogleAuth {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
        let response = self
            .provider
            .refresh_token(refresh_token)
            .await
            .map_err(|e| AuthError::OAuthFailed(format!("{:#}", e)))?;

        Ok(response.into_token_set(Some(refresh_token.to_string())))
    }

    async fn authorize(&self) -> Result<TokenSet, AuthError> {
        let (auth_url, expected_state) = self.provider.authorization_url(self.port);

        tracing::info!("Opening browser for Google authorization...");
        tracing::info!("Auth URL: {}", auth_url);

        let (code, state) = self.wait_for_callback(&auth_url).await?;

        if state != expected_state {
            return Err(AuthError::OAuthFailed("CSRF state mismatch".to_string()));
        }
        if code.is_empty() {
            return Err(AuthError::OAuthCancelled);
        }

        let response = self
            .provider
            .exchange_code(&code, self.port)
            .await
            .map_err(|e| AuthError::OAuthFailed(format!("{:#}", e)))?;

        tracing::info!("Google authorization completed");
        Ok(response.into_token_set(None))
    }
}
