pub mod credentials;
pub mod google;
pub mod oauth;
pub mod storage;

pub use credentials::acquire_credentials;
pub use google::{GoogleOAuth2Provider, GoogleTokenResponse};
pub use oauth::{AuthProvider, GoogleAuth};
pub use storage::{CredentialStore, FileCredentialStore, TokenSet};
