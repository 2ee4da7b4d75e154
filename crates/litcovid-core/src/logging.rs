//! Logging setup: env_logger backend, routed through indicatif when a TTY is attached

use std::fmt::Arguments;

use indicatif::MultiProgress;

/// ANSI color code and padded label for a log level.
fn level_style(level: log::Level, color: bool) -> (&'static str, &'static str, &'static str) {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return ("", label, "");
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    (ansi, label, "\x1b[0m")
}

/// Render one log line. Debug and trace records carry their module target.
fn format_line(level: log::Level, target: &str, args: &Arguments<'_>, color: bool) -> String {
    let (pre, label, post) = level_style(level, color);
    if level >= log::Level::Debug {
        format!("[{pre}{label}{post}] {target}: {args}")
    } else {
        format!("[{pre}{label}{post}] {args}")
    }
}

/// Logger that prints through indicatif MultiProgress so lines do not tear the file bar.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            let line = format_line(record.level(), record.target(), record.args(), true);
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize logging. `multi` is set only in TTY mode.
///
/// `RUST_LOG` takes precedence over the `quiet`/`debug` defaults.
pub fn init_logging(quiet: bool, debug: bool, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let env = env_logger::Env::default().default_filter_or(default_level);

    if let Some(multi) = multi {
        let logger = env_logger::Builder::from_env(env).build();
        let max_level = logger.filter();

        log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone())))
            .expect("failed to init logger");
        log::set_max_level(max_level);
    } else {
        // Non-TTY: no colors, millisecond timestamps for log files
        env_logger::Builder::from_env(env)
            .format(|buf, record| {
                let line = format_line(record.level(), record.target(), record.args(), false);
                writeln!(buf, "{} {line}", buf.timestamp_millis())
            })
            .init();
    }
}
