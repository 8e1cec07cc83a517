use std::{fmt, io::Write};

use nu_ansi_term::Color::{Blue, DarkGray, Magenta, Red, Yellow};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    registry::LookupSpan,
    EnvFilter,
};

use crate::{cli::Args, utils::Colored};

/// Variable that replaces the verbosity flags with a full filter directive.
const LOG_ENV: &str = "CA_LOG";

/// Collects the message and the structured fields of an event.
#[derive(Default)]
struct EventFields {
    message: String,
    extra: Vec<(&'static str, String)>,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.extra.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.extra.push((field.name(), format!("{value:?}")));
        }
    }
}

fn level_tag(level: Level) -> Option<Colored<&'static str>> {
    match level {
        Level::TRACE => Some(Colored(Magenta, "[TRACE]")),
        Level::DEBUG => Some(Colored(Blue, "[DEBUG]")),
        Level::INFO => None,
        Level::WARN => Some(Colored(Yellow, "[WARN]")),
        Level::ERROR => Some(Colored(Red, "[ERROR]")),
    }
}

/// Plain lines for command output; tagged lines with their fields for
/// diagnostics.
pub struct CompactFormatter;

impl<S, N> FormatEvent<S, N> for CompactFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let level = *event.metadata().level();
        if let Some(tag) = level_tag(level) {
            write!(writer, "{tag} ")?;
        }
        write!(writer, "{}", fields.message)?;

        if level != Level::INFO && !fields.extra.is_empty() {
            let extra: Vec<String> = fields
                .extra
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            write!(writer, " {}", Colored(DarkGray, extra.join(" ")))?;
        }
        writeln!(writer)
    }
}

/// Command output goes to stdout, everything else to stderr.
struct StdWriter {
    stderr: bool,
}

impl Write for StdWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.stderr {
            std::io::stderr().write(buf)
        } else {
            std::io::stdout().write(buf)
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.stderr {
            std::io::stderr().flush()
        } else {
            std::io::stdout().flush()
        }
    }
}

struct LevelSplit;

impl<'a> MakeWriter<'a> for LevelSplit {
    type Writer = StdWriter;

    fn make_writer(&'a self) -> Self::Writer {
        StdWriter { stderr: false }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        StdWriter {
            stderr: *meta.level() != Level::INFO,
        }
    }
}

fn verbosity(args: &Args) -> Level {
    match (args.quiet, args.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

fn filter_directive(level: Level) -> String {
    ["ca", "ca_catalog", "ca_config", "ca_store", "ca_template", "ca_utils"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn setup_logging(args: &Args) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity(args))));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(LevelSplit)
        .with_target(false)
        .without_time();

    let result = if args.json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.event_format(CompactFormatter).try_init()
    };

    if let Err(err) = result {
        eprintln!("Failed to set up logging: {err}");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_filter_directive_covers_workspace() {
        let directive = filter_directive(Level::DEBUG);
        assert!(directive.starts_with("ca=DEBUG,"));
        assert!(directive.contains("ca_catalog=DEBUG"));
        assert!(directive.contains("ca_utils=DEBUG"));
    }

    #[test]
    fn test_verbosity() {
        let args = Args::parse_from(["ca", "dupes"]);
        assert_eq!(verbosity(&args), Level::INFO);

        let args = Args::parse_from(["ca", "-vv", "dupes"]);
        assert_eq!(verbosity(&args), Level::TRACE);

        let args = Args::parse_from(["ca", "-q", "dupes"]);
        assert_eq!(verbosity(&args), Level::ERROR);
    }

    #[test]
    fn test_level_tag() {
        assert!(level_tag(Level::INFO).is_none());
        assert!(level_tag(Level::WARN).is_some());
    }
}
