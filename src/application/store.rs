// State store - authoritative holder of the global state snapshot
use crate::application::command::Command;
use crate::application::reducer::reduce;
use crate::application::store_backend::StoreBackend;
use crate::domain::state::{GlobalState, GlobalStatePatch};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot, watch};

pub type Subscriber = Arc<dyn Fn(&GlobalState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum WriteRequest {
    Save(Arc<GlobalState>),
    Flush(oneshot::Sender<()>),
}

pub struct StateStore {
    state: watch::Sender<Arc<GlobalState>>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    writer: Mutex<Option<mpsc::UnboundedSender<WriteRequest>>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(GlobalState::default())
    }
}

impl StateStore {
    pub fn new(initial: GlobalState) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            state,
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            writer: Mutex::new(None),
        }
    }

    /// Current snapshot
    pub fn get_state(&self) -> Arc<GlobalState> {
        self.state.borrow().clone()
    }

    /// Whether the startup load has run and changes are being persisted
    #[cfg(test)]
    fn is_initialized(&self) -> bool {
        lock(&self.writer).is_some()
    }

    /// Apply a command. Snapshots that come out equal to the current one are
    /// dropped without notifying or persisting.
    pub fn dispatch(&self, command: Command) {
        let kind = command.kind();
        let mut changed = None;

        self.state.send_if_modified(|current| {
            let next = reduce(current, &command);
            if next == **current {
                return false;
            }
            let next = Arc::new(next);
            *current = next.clone();
            // Enqueue under the channel lock so writes keep dispatch order
            self.enqueue_save(&next);
            changed = Some(next);
            true
        });

        match changed {
            Some(snapshot) => {
                tracing::debug!("Applied {}", kind);
                self.notify(&snapshot);
            }
            None => tracing::debug!("{} left state unchanged", kind),
        }
    }

    /// Receiver that observes every new snapshot
    pub fn watch(&self) -> watch::Receiver<Arc<GlobalState>> {
        self.state.subscribe()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&GlobalState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let callback: Subscriber = Arc::new(callback);
        lock(&self.subscribers).push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Load the persisted snapshot (if any), then start persisting every
    /// change. Load failures fall back to the current state. A snapshot that
    /// cannot be decoded is copied to `<key>.unreadable` before the defaults
    /// overwrite it.
    pub async fn initialize(&self, backend: Arc<dyn StoreBackend>, key: &str) {
        match backend.load(key).await {
            Ok(Some(value)) => match GlobalStatePatch::deserialize(&value) {
                Ok(patch) => {
                    tracing::info!("Loaded persisted state from key {}", key);
                    self.dispatch(Command::LoadState(patch));
                }
                Err(e) => {
                    let backup_key = unreadable_key(key);
                    tracing::warn!(
                        "Persisted state under {} is unreadable, using defaults and keeping a copy under {}: {}",
                        key,
                        backup_key,
                        e
                    );
                    if let Err(e) = backend.save(&backup_key, value).await {
                        tracing::error!("Failed to back up unreadable state: {:#}", e);
                    }
                }
            },
            Ok(None) => tracing::info!("No persisted state under {}, using defaults", key),
            Err(e) => tracing::warn!("Failed to load persisted state, using defaults: {:#}", e),
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(backend, key.to_string(), rx));

        self.state.send_if_modified(|current| {
            let mut writer = lock(&self.writer);
            if writer.is_some() {
                tracing::warn!("State store already initialized, keeping existing writer");
                return false;
            }
            let _ = tx.send(WriteRequest::Save(current.clone()));
            *writer = Some(tx);
            false
        });
    }

    /// Resolves once every write queued so far has reached the backend
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        let queued = match lock(&self.writer).as_ref() {
            Some(writer) => writer.send(WriteRequest::Flush(tx)).is_ok(),
            None => false,
        };
        if queued {
            let _ = rx.await;
        }
    }

    fn enqueue_save(&self, snapshot: &Arc<GlobalState>) {
        if let Some(writer) = lock(&self.writer).as_ref() {
            if writer.send(WriteRequest::Save(snapshot.clone())).is_err() {
                tracing::warn!("Persistence writer has stopped, snapshot not saved");
            }
        }
    }

    fn notify(&self, snapshot: &GlobalState) {
        let subscribers: Vec<Subscriber> = lock(&self.subscribers)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in subscribers {
            callback(snapshot);
        }
    }
}

async fn run_writer(
    backend: Arc<dyn StoreBackend>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Save(snapshot) => {
                let value = match serde_json::to_value(snapshot.to_persisted()) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::error!("Failed to serialize state snapshot: {}", e);
                        continue;
                    }
                };
                if let Err(e) = backend.save(&key, value).await {
                    tracing::error!("Failed to persist state: {:#}", e);
                }
            }
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Persistence writer stopped");
}

pub fn unreadable_key(key: &str) -> String {
    format!("{}.unreadable", key)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
