use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::ringbuf::RingBuffer;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(5);
const TOAST_HISTORY_MAX: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A user-facing notification before it is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ToastKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { kind: ToastKind::Error, title: title.into(), body: body.into() }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, title: title.into(), body: body.into() }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { kind: ToastKind::Info, title: title.into(), body: body.into() }
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
    pub raised_at: Instant,
    /// Wall-clock label shown in the notification history.
    pub time_label: String,
}

/// In-window toast queue with a bounded history.
///
/// Cheap to clone; all clones share the same queue.
#[derive(Clone)]
pub struct ToastCenter {
    toasts: Arc<Mutex<RingBuffer<Toast>>>,
    next_id: Arc<AtomicU64>,
    desktop: Arc<AtomicBool>,
    /// Notices waiting to be mirrored to the desktop from the UI thread.
    unmirrored: Arc<Mutex<Vec<Notice>>>,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastCenter {
    pub fn new() -> Self {
        Self {
            toasts: Arc::new(Mutex::new(RingBuffer::new(TOAST_HISTORY_MAX))),
            next_id: Arc::new(AtomicU64::new(1)),
            desktop: Arc::new(AtomicBool::new(false)),
            unmirrored: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mirror every toast to a desktop notification as well, on the next [`ToastCenter::mirror_pending`].
    pub fn set_desktop_mirror(&self, enabled: bool) {
        self.desktop.store(enabled, Ordering::Relaxed);
    }

    /// Toasts raised less than [`TOAST_TTL`] before `now` and not dismissed, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<Toast> {
        self.lock()
            .iter()
            .filter(|t| now.saturating_duration_since(t.raised_at) < TOAST_TTL)
            .cloned()
            .collect()
    }

    /// Full bounded history, newest first.
    pub fn history(&self) -> Vec<Toast> {
        self.lock().iter().rev().cloned().collect()
    }

    /// Notices raised since the last call while desktop mirroring was on.
    pub fn take_unmirrored(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.unmirrored.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Show pending notices on the desktop. Blocks on the notification daemon, so it is
    /// called from the UI update path rather than from request tasks.
    pub fn mirror_pending(&self) {
        for notice in self.take_unmirrored() {
            send_desktop_notification(&notice.title, &notice.body);
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.lock().retain(|t| t.id != id);
    }

    pub fn clear(&self) {
        self.lock().retain(|_| false);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn count_of(&self, kind: ToastKind) -> usize {
        self.lock().iter().filter(|t| t.notice.kind == kind).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RingBuffer<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, notice: Notice) {
        if self.desktop.load(Ordering::Relaxed) {
            self.unmirrored
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notice.clone());
        }
        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            notice,
            raised_at: Instant::now(),
            time_label: chrono::Local::now().format("%H:%M:%S").to_string(),
        };
        self.lock().push(toast);
    }
}

/// Send a desktop notification (best-effort).
fn send_desktop_notification(title: &str, body: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .summary(title)
        .body(body)
        .appname("Mobilis")
        .timeout(notify_rust::Timeout::Milliseconds(TOAST_TTL.as_millis() as u32))
        .show()
    {
        tracing::debug!(error = %e, "Desktop notification unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_queues_toast() {
        let center = ToastCenter::new();
        center.notify(Notice::error("API Error", "boom"));
        center.notify(Notice::success("Saved", ""));
        assert_eq!(center.len(), 2);
        assert_eq!(center.count_of(ToastKind::Error), 1);
        let history = center.history();
        assert_eq!(history[0].notice.title, "Saved");
        assert!(history[0].id > history[1].id);
    }

    #[test]
    fn test_visible_expires_after_ttl() {
        let center = ToastCenter::new();
        center.notify(Notice::info("Hello", "world"));
        let now = Instant::now();
        assert_eq!(center.visible(now).len(), 1);
        assert!(center.visible(now + TOAST_TTL + Duration::from_millis(1)).is_empty());
        // Expired toasts stay in the history.
        assert_eq!(center.history().len(), 1);
    }

    #[test]
    fn test_dismiss_and_clear() {
        let center = ToastCenter::new();
        center.notify(Notice::info("a", ""));
        center.notify(Notice::info("b", ""));
        let first = center.history()[1].id;
        center.dismiss(first);
        assert_eq!(center.len(), 1);
        center.clear();
        assert_eq!(center.len(), 0);
    }

    #[test]
    fn test_desktop_mirroring_is_deferred() {
        let center = ToastCenter::new();
        center.notify(Notice::error("quiet", ""));
        assert!(center.take_unmirrored().is_empty());

        center.set_desktop_mirror(true);
        let worker = center.clone();
        std::thread::spawn(move || worker.notify(Notice::error("API Error", "down")))
            .join()
            .unwrap();
        let pending = center.take_unmirrored();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "API Error");
        assert!(center.take_unmirrored().is_empty());
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn test_clones_share_queue() {
        let center = ToastCenter::new();
        let other = center.clone();
        other.notify(Notice::error("x", "y"));
        assert_eq!(center.len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let center = ToastCenter::new();
        for i in 0..(TOAST_HISTORY_MAX + 10) {
            center.notify(Notice::info(format!("t{i}"), ""));
        }
        assert_eq!(center.len(), TOAST_HISTORY_MAX);
    }
}
