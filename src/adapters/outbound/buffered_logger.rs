use crate::domains::logger::DomainLogger;
use std::sync::Arc;
use tokio::sync::mpsc;

enum Level {
    Info,
    Warn,
    Error,
}

struct LogLine {
    level: Level,
    msg: String,
}

struct BufferedLogger {
    sender: mpsc::Sender<LogLine>,
}

impl BufferedLogger {
    fn push(&self, level: Level, msg: &str) {
        // Dropped when the buffer is full so callers never wait on logging
        let _ = self.sender.try_send(LogLine {
            level,
            msg: msg.to_string(),
        });
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
}

/// Non-blocking logger: lines go through a bounded channel of `capacity` and are
/// written to `sink` by a background task. Must be called inside a Tokio runtime.
pub fn init_buffered_logger(sink: Arc<dyn DomainLogger>, capacity: usize) -> Arc<dyn DomainLogger> {
    let (tx, mut rx) = mpsc::channel::<LogLine>(capacity.max(1));

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            match line.level {
                Level::Info => sink.info(&line.msg),
                Level::Warn => sink.warn(&line.msg),
                Level::Error => sink.error(&line.msg),
            }
        }
    });

    Arc::new(BufferedLogger { sender: tx })
}
