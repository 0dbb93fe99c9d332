use crate::domains::logger::DomainLogger;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

enum Level {
    Info,
    Warn,
    Error,
}

/// Non-blocking logger: messages are queued on a bounded channel and forwarded to the bridge
/// from a background task. When the queue is full the message is dropped and counted.
pub struct BufferedLogger {
    sender: mpsc::Sender<(Level, String)>,
    dropped: AtomicU64,
}

impl BufferedLogger {
    /// Must be called inside a tokio runtime.
    pub fn spawn(bridge: Arc<dyn DomainLogger>, capacity: usize) -> (Arc<Self>, JoinHandle<()>) {
        let (sender, mut rx) = mpsc::channel::<(Level, String)>(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some((level, msg)) = rx.recv().await {
                match level {
                    Level::Info => bridge.info(&msg),
                    Level::Warn => bridge.warn(&msg),
                    Level::Error => bridge.error(&msg),
                }
            }
        });
        let logger = Arc::new(Self {
            sender,
            dropped: AtomicU64::new(0),
        });
        (logger, handle)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn enqueue(&self, level: Level, msg: &str) {
        if self.sender.try_send((level, msg.to_string())).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.enqueue(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.enqueue(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.enqueue(Level::Error, msg);
    }
}
