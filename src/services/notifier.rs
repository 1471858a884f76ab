//! Listener fan-out for dispatched lines.
//!
//! Each subscriber gets its own unbounded channel, so a slow listener never
//! blocks the dispatcher and events arrive in dispatch order.

use tokio::sync::mpsc;

use crate::domain::models::LogEvent;

#[derive(Debug, Default)]
pub struct Notifier {
    listeners: Vec<mpsc::UnboundedSender<LogEvent>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Only events emitted after this call are delivered.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LogEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    /// Send `event` to every live listener, dropping those whose receiver is gone.
    pub fn emit(&mut self, event: &LogEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
