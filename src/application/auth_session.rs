// Auth session - the bearer token captured from the OAuth callback
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the most recent access token. Tokens live in memory only.
#[derive(Clone)]
pub struct AuthSession {
    token: Arc<watch::Sender<Option<String>>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        let (token, _) = watch::channel(None);
        Self {
            token: Arc::new(token),
        }
    }
}

impl AuthSession {
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn set_token(&self, token: String) {
        self.token.send_replace(Some(token));
    }

    /// Wait until a token is available, returning immediately if one already is
    pub async fn wait_for_token(&self) -> Option<String> {
        let mut rx = self.token.subscribe();
        rx.wait_for(Option::is_some).await.ok().and_then(|token| token.clone())
    }
}
