//! Service layer: the dispatcher facade and its listener fan-out.

pub mod dispatcher;
pub mod notifier;

pub use dispatcher::LogDispatcher;
pub use notifier::Notifier;
