use super::token::{current_time_secs, AccessToken, TokenStore};
use crate::domains::logger::DynLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Missing,
    Valid,
    Expired,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Expired,
    Invalid(String),
}

/// Inspect the stored token without touching it.
pub fn check_token(store: &dyn TokenStore, now_secs: u64, skew_secs: u64) -> TokenStatus {
    let Some(raw) = store.get() else {
        return TokenStatus::Missing;
    };
    match AccessToken::parse(&raw) {
        Ok(token) if token.is_expired(now_secs, skew_secs) => TokenStatus::Expired,
        Ok(_) => TokenStatus::Valid,
        Err(e) => TokenStatus::Malformed(e.to_string()),
    }
}

/// Periodic token expiry check with an explicit owner.
///
/// On the first expired or malformed token the store is cleared, one
/// [`SessionEvent`] is sent and the task ends.
pub struct TokenExpiryWatcher {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TokenExpiryWatcher {
    pub fn spawn(
        store: Arc<dyn TokenStore>,
        logger: DynLogger,
        interval: Duration,
        skew_secs: u64,
        events: mpsc::Sender<SessionEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let event = match check_token(store.as_ref(), current_time_secs(), skew_secs) {
                    TokenStatus::Missing | TokenStatus::Valid => continue,
                    TokenStatus::Expired => {
                        logger.warn("Access token expired, clearing session");
                        SessionEvent::Expired
                    }
                    TokenStatus::Malformed(reason) => {
                        logger.error(&format!("Stored access token is unreadable: {}", reason));
                        SessionEvent::Invalid(reason)
                    }
                };
                store.clear();
                let _ = events.send(event).await;
                break;
            }
        });

        Self { cancel, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the ticker and wait for the task to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
