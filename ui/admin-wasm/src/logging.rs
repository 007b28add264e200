//! Forwards `tracing` events from the shared crates to the browser console.
//!
//! Warnings and errors always print; everything else goes through
//! [`console::debug`], which only prints with `"debug": true` in the page
//! config.

use crate::console;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let text = line.finish();
        if matches!(*event.metadata().level(), Level::ERROR | Level::WARN) {
            console::warn(&text);
        } else {
            console::debug(&text);
        }
    }
}

/// `message key=value key=value`
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<String>,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        format!("{} {}", self.message, self.fields.join(" "))
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// Install the console layer as the global subscriber. A second call only
/// reports that one is already set.
pub fn init() {
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        console::warn(&format!("tracing already initialised: {e}"));
    }
}
