use super::ports::ReminderSource;
use super::types::Reminder;
use crate::domains::logger::DynLogger;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Reminders that are due at `now` and not yet in `seen`, in input order.
/// Selected ids are added to `seen`; ids missing from `reminders` are dropped
/// from it, so the set never outgrows the backend's current list.
pub fn due_reminders(reminders: Vec<Reminder>, seen: &mut HashSet<String>, now: DateTime<Utc>) -> Vec<Reminder> {
    seen.retain(|id| reminders.iter().any(|r| &r.id == id));
    reminders
        .into_iter()
        .filter(|r| r.is_due(now))
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

/// Background task that polls a [`ReminderSource`] and forwards each due
/// reminder exactly once.
pub struct ReminderPoller {
    cancel: CancellationToken,
    handle: JoinHandle<HashSet<String>>,
}

impl ReminderPoller {
    pub fn spawn(
        source: Arc<dyn ReminderSource>,
        logger: DynLogger,
        interval: Duration,
        out: mpsc::Sender<Reminder>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut seen = HashSet::new();
            let mut ticker = tokio::time::interval(interval);
            'poll: loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = out.closed() => break,
                    _ = ticker.tick() => {}
                }
                if out.is_closed() {
                    break;
                }

                let reminders = match source.fetch_reminders().await {
                    Ok(r) => r,
                    Err(e) => {
                        logger.warn(&format!("Failed to fetch reminders: {}", e));
                        continue;
                    }
                };

                for reminder in due_reminders(reminders, &mut seen, Utc::now()) {
                    if out.send(reminder).await.is_err() {
                        break 'poll;
                    }
                }
            }
            seen
        });

        Self { cancel, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop polling. Returns the ids shown during the poller's lifetime.
    pub async fn stop(self) -> HashSet<String> {
        self.cancel.cancel();
        self.handle.await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn reminder(id: &str, offset_secs: i64, now: DateTime<Utc>) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: format!("Call back {}", id),
            remind_at: now + ChronoDuration::seconds(offset_secs),
            note: None,
        }
    }

    #[test]
    fn selects_due_unseen_reminders_once() {
        let now = Utc::now();
        let mut seen = HashSet::new();
        let batch = vec![reminder("r1", -10, now), reminder("r2", 60, now), reminder("r3", 0, now)];

        let due: Vec<_> = due_reminders(batch.clone(), &mut seen, now).into_iter().map(|r| r.id).collect();
        assert_eq!(due, vec!["r1", "r3"]);

        assert!(due_reminders(batch, &mut seen, now).is_empty());
    }

    #[test]
    fn forgets_reminders_the_backend_no_longer_lists() {
        let now = Utc::now();
        let mut seen = HashSet::new();

        due_reminders(vec![reminder("r1", -10, now), reminder("r2", -5, now)], &mut seen, now);
        assert_eq!(seen.len(), 2);

        let due = due_reminders(vec![reminder("r2", -5, now)], &mut seen, now);
        assert!(due.is_empty());
        assert_eq!(seen, HashSet::from(["r2".to_string()]));
    }
}
