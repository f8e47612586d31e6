// Auth service - OAuth implicit flow and auth settings import/export
use crate::application::auth_session::AuthSession;
use crate::application::command::Command;
use crate::application::store::StateStore;
use crate::domain::auth::{AuthSettings, AuthSettingsPatch};
use crate::infrastructure::auth_callback::spawn_callback_listener;
use crate::infrastructure::config::AuthConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Opens URLs in the user's browser
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to start callback listener: {0}")]
    Listener(#[source] std::io::Error),
    #[error("failed to open browser: {0}")]
    Browser(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid auth config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What was handed to the browser for one authentication attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub settings: AuthSettings,
    pub authorize_url: String,
    pub redirect_uri: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<StateStore>,
    session: AuthSession,
    browser: Arc<dyn BrowserLauncher>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        store: Arc<StateStore>,
        session: AuthSession,
        browser: Arc<dyn BrowserLauncher>,
        config: AuthConfig,
    ) -> Self {
        Self {
            store,
            session,
            browser,
            config,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn settings(&self) -> AuthSettings {
        self.store.get_state().auth_settings.clone()
    }

    pub fn update_settings(&self, patch: AuthSettingsPatch) -> AuthSettings {
        self.store.dispatch(Command::UpdateAuthSettings(patch));
        self.settings()
    }

    /// Start the callback listener and send the browser to the authorize URL.
    /// The token arrives later in the session.
    pub async fn start(&self) -> Result<AuthRequest, AuthError> {
        let settings = self.settings();
        let listener = spawn_callback_listener(
            self.config.callback_port,
            &self.config.callback_path,
            Duration::from_secs(self.config.callback_timeout_secs),
        )
        .await
        .map_err(AuthError::Listener)?;

        let authorize_url = settings.authorize_url(&listener.redirect_uri);
        let redirect_uri = listener.redirect_uri.clone();
        tracing::info!("Auth callback listening on {}", listener.local_addr);

        let session = self.session.clone();
        tokio::spawn(async move {
            match listener.token.await {
                Ok(Some(token)) => {
                    tracing::info!("Received access token from auth callback");
                    session.set_token(token);
                }
                Ok(None) => tracing::warn!("Auth callback arrived without a token"),
                Err(_) => tracing::warn!("Auth callback listener closed before a token arrived"),
            }
        });

        if self.config.open_browser {
            self.browser
                .open(&authorize_url)
                .map_err(|e| AuthError::Browser(format!("{:#}", e)))?;
        }

        Ok(AuthRequest {
            settings,
            authorize_url,
            redirect_uri,
        })
    }

    pub fn export_settings(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.settings())
    }

    /// Merge an exported (possibly partial) auth config into the state
    pub fn import_settings(&self, raw: &str) -> Result<AuthSettings, ImportError> {
        let patch: AuthSettingsPatch = serde_json::from_str(raw).map_err(|e| {
            tracing::warn!("Rejected auth config import: {}", e);
            e
        })?;
        Ok(self.update_settings(patch))
    }
}
