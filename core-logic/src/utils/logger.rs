use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter, Layer,
};

/// Console directives used when `RUST_LOG` is not set.
const CONSOLE_DEFAULT_DIRECTIVES: &str = "info";

pub fn setup_logger() -> Option<WorkerGuard> {
    // Create logs directory
    std::fs::create_dir_all("logs").ok();

    // HOURLY rotation keeps individual files small
    let file_appender = tracing_appender::rolling::hourly("logs", "puzzlemania");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer: DEBUG catches the handshake step trace
    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_target("report", tracing::Level::INFO)
        .with_default(tracing::Level::DEBUG);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    // Console layer: INFO is the interactive surface, RUST_LOG overrides
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_env_filter());

    // Combine both layers
    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    // Return guard - MUST be kept alive by caller
    Some(guard)
}

/// Console filter: the `RUST_LOG` directives when set, `info` otherwise.
fn console_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(CONSOLE_DEFAULT_DIRECTIVES))
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
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
        // Extract message
        let mut msg_visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut msg_visitor);
        let msg = msg_visitor.message;

        // Report lines arrive pre-styled and render verbatim
        if event.metadata().target() == "report" {
            return writeln!(writer, "{}", msg);
        }

        // Diagnostics: HH:MM:SS LEVEL message, tinted by level
        let timestamp = Local::now().format("%H:%M:%S");
        let level = *event.metadata().level();
        let level_text = match level {
            Level::ERROR => Style::new().fg(Color::LightRed).paint("ERROR"),
            Level::WARN => Style::new().fg(Color::LightYellow).paint(" WARN"),
            Level::INFO => Style::new().fg(Color::LightGreen).paint(" INFO"),
            Level::DEBUG => Style::new().fg(Color::LightBlue).paint("DEBUG"),
            Level::TRACE => Style::new().fg(Color::LightMagenta).paint("TRACE"),
        };
        let styled = match level {
            Level::ERROR => Style::new().fg(Color::LightRed).paint(msg).to_string(),
            Level::WARN => Style::new().fg(Color::LightYellow).paint(msg).to_string(),
            _ => msg,
        };

        writeln!(writer, "{} {} {}", timestamp, level_text, styled)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
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
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;

        let mut msg_visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut msg_visitor);
        writeln!(writer, "{}", msg_visitor.message)
    }
}
