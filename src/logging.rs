//! Logging utilities
//!
//! This module provides a tracing event formatter that prefixes each line
//! with the workflow command the Actions runner turns into an annotation.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::output::actions::escape_data;

/// Line prefix for a level
pub fn annotation_prefix(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "::error::",
        Level::WARN => "::warning::",
        Level::INFO => "::info::",
        _ => "::debug::",
    }
}

/// Formats events as `::<level>::message key=value ...`
///
/// Error, warning and debug lines are workflow commands, so their newlines
/// and `%` are escaped to keep each event a single annotation. `::info::` is
/// not a command the runner parses and is written as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionsFormat;

impl<S, N> FormatEvent<S, N> for ActionsFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = event.metadata().level();
        let mut line = visitor.message;
        for (name, value) in &visitor.fields {
            write!(line, " {}={}", name, value)?;
        }

        if *level == Level::INFO {
            writeln!(writer, "{}{}", annotation_prefix(level), line)
        } else {
            writeln!(writer, "{}{}", annotation_prefix(level), escape_data(&line))
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }
}
