// One-shot OAuth redirect listener on the loopback interface
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};

pub const CALLBACK_ROUTE: &str = "/callback";

// Implicit-flow tokens arrive in the URL fragment, which never reaches the
// server; this page forwards it as a query parameter.
const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Authentication</title>
</head>
<body>
  <script>
    const params = new URLSearchParams(window.location.hash.substring(1));
    const accessToken = params.get('access_token');
    if (accessToken) {
      window.location.href = '/callback?token=' + encodeURIComponent(accessToken);
    } else {
      document.body.innerText = 'No token found in the redirect.';
    }
  </script>
</body>
</html>"#;

pub struct CallbackListener {
    pub redirect_uri: String,
    pub local_addr: SocketAddr,
    /// Resolves once with the token (or `None` if the callback had none).
    /// Errors if the listener timed out first.
    pub token: oneshot::Receiver<Option<String>>,
}

#[derive(Clone)]
struct CallbackState {
    sender: Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>,
    shutdown: Arc<Notify>,
}

#[derive(Deserialize)]
struct CallbackQuery {
    token: Option<String>,
}

/// Bind `127.0.0.1:port` and serve the redirect page at `path` plus the
/// token callback. The listener stops after the first callback or after
/// `timeout`.
pub async fn spawn_callback_listener(
    port: u16,
    path: &str,
    timeout: Duration,
) -> std::io::Result<CallbackListener> {
    if !path.starts_with('/') || path == CALLBACK_ROUTE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid callback path {}", path),
        ));
    }

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let local_addr = listener.local_addr()?;
    let redirect_uri = format!("http://localhost:{}{}", local_addr.port(), path);

    let (tx, rx) = oneshot::channel();
    let shutdown = Arc::new(Notify::new());
    let state = CallbackState {
        sender: Arc::new(Mutex::new(Some(tx))),
        shutdown: shutdown.clone(),
    };

    let router = Router::new()
        .route(path, get(login_page))
        .route(CALLBACK_ROUTE, get(receive_token))
        .with_state(state);

    tokio::spawn(async move {
        let stop = async move {
            tokio::select! {
                _ = shutdown.notified() => {}
                _ = tokio::time::sleep(timeout) => {
                    tracing::warn!("Auth callback listener timed out after {:?}", timeout);
                }
            }
        };

        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(stop)
            .await
        {
            tracing::error!("Auth callback listener failed: {}", e);
        }
        tracing::debug!("Auth callback listener on {} closed", local_addr);
    });

    Ok(CallbackListener {
        redirect_uri,
        local_addr,
        token: rx,
    })
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

async fn receive_token(
    State(state): State<CallbackState>,
    Query(query): Query<CallbackQuery>,
) -> Html<&'static str> {
    let token = query.token.filter(|t| !t.is_empty());
    let received = token.is_some();

    let sender = state
        .sender
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    if let Some(sender) = sender {
        let _ = sender.send(token);
    }
    state.shutdown.notify_one();

    if received {
        Html("Authentication succeeded. You can close this window.")
    } else {
        Html("No token received.")
    }
}
