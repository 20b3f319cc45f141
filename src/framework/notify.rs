//! # Notification Relay
//!
//! Transient user-facing messages ("Tire created successfully", "Failed to cancel order").
//!
//! Notices are kept for a fixed time-to-live and are also pushed to every live subscriber
//! over a broadcast channel, so a UI layer can render toasts without polling. Delivery is
//! fire-and-forget: nobody listening is not an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{error, info};

/// How long a notice stays in [`Notifier::active`] by default.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: Instant,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

struct Inner {
    notices: Mutex<Vec<Notice>>,
    next_id: AtomicU64,
    ttl: Duration,
    sender: broadcast::Sender<Notice>,
}

/// Cloneable handle; all clones share the same notice list and channel.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                notices: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                ttl,
                sender,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.inner
            .notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notify_success(&self, message: impl Into<String>) -> Notice {
        let message = message.into();
        info!(notice = %message, "Success notice");
        self.push(NoticeLevel::Success, message)
    }

    pub fn notify_error(&self, message: impl Into<String>) -> Notice {
        let message = message.into();
        error!(notice = %message, "Error notice");
        self.push(NoticeLevel::Error, message)
    }

    fn push(&self, level: NoticeLevel, message: String) -> Notice {
        let notice = Notice {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            level,
            message,
            created_at: Instant::now(),
        };
        {
            let mut notices = self.lock();
            prune(&mut notices, self.inner.ttl);
            notices.push(notice.clone());
        }
        // Err only means there are no receivers right now.
        let _ = self.inner.sender.send(notice.clone());
        notice
    }

    /// Notices younger than the TTL, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        let mut notices = self.lock();
        prune(&mut notices, self.inner.ttl);
        notices.clone()
    }

    /// Remove a notice before it expires. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut notices = self.lock();
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Receive every notice emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.inner.sender.subscribe()
    }
}

fn prune(notices: &mut Vec<Notice>, ttl: Duration) {
    notices.retain(|n| n.created_at.elapsed() < ttl);
}
