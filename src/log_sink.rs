//! User-facing log channel from the worker to the UI.
//!
//! The worker writes through a cloneable [`LogSink`]; the UI drains the
//! matching [`LogDrain`] on its repaint timer.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Producer half
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: UnboundedSender<String>,
}

/// Consumer half
#[derive(Debug)]
pub struct LogDrain {
    rx: UnboundedReceiver<String>,
}

/// Creates a connected sink/drain pair.
pub fn channel() -> (LogSink, LogDrain) {
    let (tx, rx) = unbounded_channel();
    (LogSink { tx }, LogDrain { rx })
}

impl LogSink {
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        // The drain only goes away with the UI; nothing left to report to.
        let _ = self.tx.send(message);
    }
}

impl LogDrain {
    /// Takes every message queued so far, oldest first, without blocking.
    pub fn drain(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_is_fifo_and_destructive() {
        let (sink, mut drain) = channel();
        sink.log("one");
        sink.clone().log(String::from("two"));
        assert_eq!(drain.drain(), ["one", "two"]);
        assert!(drain.drain().is_empty());
    }

    #[test]
    fn sink_survives_dropped_drain() {
        let (sink, drain) = channel();
        drop(drain);
        sink.log("nobody listening");
    }

    #[test]
    fn producer_on_another_thread() {
        let (sink, mut drain) = channel();
        std::thread::spawn(move || {
            for i in 0..3 {
                sink.log(format!("line {i}"));
            }
        })
        .join()
        .unwrap();
        assert_eq!(drain.drain(), ["line 0", "line 1", "line 2"]);
    }
}
