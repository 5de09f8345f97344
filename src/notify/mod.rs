//! Best-effort outbound notifications. Nothing in here ever reports an
//! error to the caller: failures are logged and dropped.

mod telegram;

pub use telegram::TelegramNotifier;

use crate::config::Config;
use chrono::{DateTime, FixedOffset};
use std::thread::JoinHandle;
use std::time::Duration;

pub trait Notifier {
    /// Start delivering `message` to every recipient and return at once.
    fn notify(&self, message: &str) -> Dispatch;
}

/// Detached deliveries started by one `notify` call.
///
/// Dropping it leaves the workers running; a short-lived process calls
/// [`Dispatch::wait`] so they get their bounded time to finish.
#[derive(Default)]
pub struct Dispatch {
    handles: Vec<JoinHandle<()>>,
}

impl Dispatch {
    pub fn from_handles(handles: Vec<JoinHandle<()>>) -> Self {
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn wait(self) {
        for h in self.handles {
            if h.join().is_err() {
                tracing::warn!("notification worker panicked");
            }
        }
    }
}

/// Used when no transport is configured.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, message: &str) -> Dispatch {
        tracing::debug!(message, "no notification recipients configured");
        Dispatch::default()
    }
}

/// Telegram when a token and at least one chat id are configured, otherwise
/// a no-op.
pub fn from_config(cfg: &Config) -> Box<dyn Notifier> {
    let recipients = cfg.chat_ids();
    let token = cfg.telegram_bot_token.as_deref().unwrap_or("");
    if token.is_empty() || recipients.is_empty() {
        return Box::new(NoopNotifier);
    }

    match TelegramNotifier::new(
        &cfg.telegram_api_base,
        token,
        recipients,
        Duration::from_secs(cfg.notify_timeout_secs),
    ) {
        Ok(n) => Box::new(n),
        Err(e) => {
            tracing::warn!(error = %e, "notifier unavailable, continuing without it");
            Box::new(NoopNotifier)
        }
    }
}

/// Text sent for every logged kick.
pub fn kick_message(at: &DateTime<FixedOffset>, day_total: i64) -> String {
    format!(
        "👶 Kick logged!\nTime: {}\nTotal today: {}",
        at.format("%H:%M"),
        day_total
    )
}
