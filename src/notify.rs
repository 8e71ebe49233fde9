//! Transient user-facing notifications.
//!
//! DESIGN
//! ======
//! Notifications render in insertion order. Each one with a positive duration
//! owns a spawned expiry task keyed by its id; `remove` and `clear` abort the
//! matching tasks so no timer outlives the notification it was created for.
//! Expiry tasks hold a weak handle to the queue and only ever remove.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// Display time used when the caller does not pick one.
    #[must_use]
    pub fn default_duration_ms(self) -> i64 {
        match self {
            Self::Success | Self::Info => 5000,
            Self::Warning => 6000,
            Self::Error => 7000,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    /// Milliseconds until auto-removal; `<= 0` keeps it until removed.
    #[serde(rename = "durationMs")]
    pub duration_ms: i64,
}

/// Shared, cloneable handle to the notification list.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    items: watch::Sender<Vec<Notification>>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self { inner: Arc::new(QueueInner { items, timers: Mutex::new(HashMap::new()) }) }
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.enqueue(NotificationKind::Success, message, NotificationKind::Success.default_duration_ms())
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.enqueue(NotificationKind::Error, message, NotificationKind::Error.default_duration_ms())
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.enqueue(NotificationKind::Warning, message, NotificationKind::Warning.default_duration_ms())
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.enqueue(NotificationKind::Info, message, NotificationKind::Info.default_duration_ms())
    }

    /// Append a notification and schedule its removal. Returns the new id.
    ///
    /// Scheduling needs a tokio runtime; outside one the notification stays
    /// until removed explicitly.
    pub fn enqueue(&self, kind: NotificationKind, message: impl Into<String>, duration_ms: i64) -> String {
        let message = message.into();
        let mut id = String::new();
        self.inner.items.send_modify(|items| {
            id = generate_id();
            while items.iter().any(|n| n.id == id) {
                id = generate_id();
            }
            items.push(Notification { id: id.clone(), kind, message: message.clone(), duration_ms });
        });
        tracing::debug!(%id, kind = kind.label(), %message, "notification queued");

        if duration_ms > 0 {
            self.schedule_expiry(&id, Duration::from_millis(duration_ms.unsigned_abs()));
        }
        id
    }

    fn schedule_expiry(&self, id: &str, delay: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%id, "no async runtime; notification will not auto-expire");
            return;
        };
        let weak: Weak<QueueInner> = Arc::downgrade(&self.inner);
        let task_id = id.to_owned();
        let mut timers = self.inner.timers.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire(&task_id);
            }
        });
        timers.insert(id.to_owned(), handle);
    }

    /// Remove one notification and cancel its timer. Unknown ids are ignored.
    pub fn remove(&self, id: &str) {
        if let Some(handle) = self.inner.timers.lock().unwrap_or_else(PoisonError::into_inner).remove(id) {
            handle.abort();
        }
        self.inner.remove_item(id);
    }

    /// Remove everything and cancel every pending timer.
    pub fn clear(&self) {
        let handles: Vec<JoinHandle<()>> = self
            .inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        for handle in handles {
            handle.abort();
        }
        self.inner.items.send_modify(Vec::clear);
    }

    /// Current notifications in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.items.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.items.subscribe()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        self.inner.timers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl QueueInner {
    fn expire(&self, id: &str) {
        // Drop our own handle without aborting the task that is running us.
        self.timers.lock().unwrap_or_else(PoisonError::into_inner).remove(id);
        self.remove_item(id);
    }

    fn remove_item(&self, id: &str) {
        self.items.send_if_modified(|items| {
            let before = items.len();
            items.retain(|n| n.id != id);
            items.len() != before
        });
    }
}

/// `<unix millis>-<7 base-36 chars>`.
fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{millis}-{suffix}")
}
