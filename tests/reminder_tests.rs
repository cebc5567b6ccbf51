use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use crm_assign::adapters::outbound::init_noop_logger;
use crm_assign::domains::reminders::*;
use crm_assign::{GatewayError, GatewayResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Fails on the first fetch, then always returns the same two reminders,
/// one due and one far in the future.
struct FlakySource {
    calls: AtomicUsize,
}

#[async_trait]
impl ReminderSource for FlakySource {
    async fn fetch_reminders(&self) -> GatewayResult<Vec<Reminder>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(GatewayError::Transport("backend warming up".into()));
        }
        let now = Utc::now();
        Ok(vec![
            Reminder {
                id: "r1".into(),
                title: "Call the Johnsons".into(),
                remind_at: now - ChronoDuration::minutes(5),
                note: Some("about the 3BHK".into()),
            },
            Reminder {
                id: "r2".into(),
                title: "Site visit".into(),
                remind_at: now + ChronoDuration::days(1),
                note: None,
            },
        ])
    }
}

#[tokio::test]
async fn test_poller_survives_errors_and_shows_each_reminder_once() {
    let source = Arc::new(FlakySource {
        calls: AtomicUsize::new(0),
    });
    let (tx, mut rx) = mpsc::channel(8);
    let poller = ReminderPoller::spawn(source.clone(), init_noop_logger(), Duration::from_millis(10), tx);

    let first = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
    assert_eq!(first.id, "r1");

    // Let a few more polls happen; r1 must not come back and r2 is not due
    while source.calls.load(Ordering::SeqCst) < 5 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(rx.try_recv().is_err());

    let shown = poller.stop().await;
    assert_eq!(shown.len(), 1);
    assert!(shown.contains("r1"));
}

/// Always answers with an empty list and counts how often it was asked.
struct QuietSource {
    calls: AtomicUsize,
}

#[async_trait]
impl ReminderSource for QuietSource {
    async fn fetch_reminders(&self) -> GatewayResult<Vec<Reminder>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

async fn wait_until_finished(poller: &ReminderPoller) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !poller.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_poller_does_not_fetch_without_a_receiver() {
    let source = Arc::new(QuietSource {
        calls: AtomicUsize::new(0),
    });
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let poller = ReminderPoller::spawn(source.clone(), init_noop_logger(), Duration::from_millis(10), tx);
    wait_until_finished(&poller).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_poller_ends_when_receiver_is_dropped_while_idle() {
    let source = Arc::new(QuietSource {
        calls: AtomicUsize::new(0),
    });
    let (tx, rx) = mpsc::channel(1);
    let poller = ReminderPoller::spawn(source.clone(), init_noop_logger(), Duration::from_millis(10), tx);

    while source.calls.load(Ordering::SeqCst) < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!poller.is_finished());

    drop(rx);
    wait_until_finished(&poller).await;

    let calls = source.calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), calls);
}

#[test]
fn test_reminder_payload_shape() {
    let r: Reminder =
        serde_json::from_str(r#"{"_id":"r9","title":"Renew lease","remindAt":"2026-10-18T09:00:00Z"}"#).unwrap();
    assert_eq!(r.id, "r9");
    assert!(r.note.is_none());
    assert!(r.is_due("2026-10-18T09:00:00Z".parse().unwrap()));
}
