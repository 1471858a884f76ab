//! Tracing bridge
//!
//! [`CategoryLayer`] forwards every `tracing` event to a [`LogDispatcher`],
//! making the dispatcher the process-wide sink for the host's log macros.
//! The category is taken from a `category` field when present, otherwise
//! from the event target:
//!
//! ```no_run
//! use std::sync::Arc;
//! use catlog::{bridge, LogDispatcher};
//!
//! let dispatcher = Arc::new(LogDispatcher::new());
//! dispatcher.init("./logs", "app").expect("log directory must be writable");
//! bridge::install(Arc::clone(&dispatcher)).expect("no other subscriber installed");
//!
//! tracing::warn!(category = "net", "connection lost");
//! ```
//!
//! Events emitted by this crate are never forwarded, so diagnostics raised
//! while the dispatcher lock is held cannot re-enter it.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::errors::{LogError, LogResult};
use crate::domain::models::{Severity, SourceLocation};
use crate::services::dispatcher::LogDispatcher;

const INTERNAL_TARGET: &str = env!("CARGO_CRATE_NAME");

fn is_internal(target: &str) -> bool {
    target == INTERNAL_TARGET
        || target
            .strip_prefix(INTERNAL_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Layer routing tracing events into a dispatcher
pub struct CategoryLayer {
    dispatcher: Arc<LogDispatcher>,
}

impl CategoryLayer {
    pub const fn new(dispatcher: Arc<LogDispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl<S: Subscriber> Layer<S> for CategoryLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let category = visitor
            .category
            .take()
            .unwrap_or_else(|| metadata.target().to_string());
        let location = metadata.file().map(|file| {
            let location = SourceLocation::new(file, metadata.line().unwrap_or(0));
            match metadata.module_path() {
                Some(module) => location.with_function(module),
                None => location,
            }
        });

        let severity = Severity::from(*metadata.level());
        let message = visitor.into_message();

        if let Err(e) = self
            .dispatcher
            .handle_message(severity, &category, location.as_ref(), &message)
        {
            tracing::error!(error = %e, category = %category, "failed to dispatch tracing event");
        }
    }
}

/// Collects the `message` field, the optional `category` field and any
/// remaining fields as ` key=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    category: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn into_message(mut self) -> String {
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            "category" => self.category = Some(value.to_string()),
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            "category" => self.category = Some(format!("{value:?}").trim_matches('"').to_string()),
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }
}

/// Install the dispatcher as the global tracing subscriber.
///
/// The crate's own diagnostics are printed to stderr at `warn` and above
/// (override with `RUST_LOG`, e.g. `RUST_LOG=catlog=debug`). Host events
/// only go to the dispatcher.
pub fn install(dispatcher: Arc<LogDispatcher>) -> LogResult<()> {
    tracing_subscriber::registry()
        .with(CategoryLayer::new(dispatcher))
        .with(diagnostics_layer(std::io::stderr))
        .try_init()
        .map_err(|e| LogError::SubscriberInstall(e.to_string()))
}

/// Formatting layer for events targeted at this crate only.
fn diagnostics_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{INTERNAL_TARGET}=warn")));

    tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_filter(level_filter)
        .with_filter(filter_fn(|metadata| is_internal(metadata.target())))
}
