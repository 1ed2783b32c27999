//! Logging setup for the drive executables
//!
//! Records go to two outputs: the terminal, with coloured level tags, and the session log file,
//! with plain tags. Each line is stamped with the seconds since the session started.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use thiserror::Error;

use crate::session::{self, Session};

pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Minimum log level must include info messages, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Could not open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise logging to the terminal and the session's log file.
///
/// `min_level` must let info messages through, since lifecycle events are logged at info. Only
/// the first successful call has any effect.
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    check_level(min_level)?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let terminal = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}{}",
                session::get_elapsed_seconds(),
                coloured_tag(record.level()),
                target_prefix(record),
                message
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}{}",
                session::get_elapsed_seconds(),
                tag(record.level()),
                target_prefix(record),
                message
            ))
        })
        .chain(log_file);

    fern::Dispatch::new()
        .level(min_level)
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging at {:?} to {:?}", min_level, session.log_file_path);
    if let Some(epoch) = session::get_epoch() {
        info!("Session started at {}", epoch);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        Err(LoggerInitError::InvalidMinLogLevel(min_level))
    } else {
        Ok(())
    }
}

/// Module path of the record, only shown for debug and trace messages.
fn target_prefix(record: &Record) -> String {
    if record.level() > Level::Info {
        format!("{}: ", record.target())
    } else {
        String::new()
    }
}

fn tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

fn coloured_tag(level: Level) -> ColoredString {
    let t = tag(level);

    match level {
        Level::Trace => t.dimmed().italic(),
        Level::Debug => t.dimmed(),
        Level::Info => t.normal(),
        Level::Warn => t.yellow(),
        Level::Error => t.red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_min_level() {
        assert!(check_level(LevelFilter::Trace).is_ok());
        assert!(check_level(LevelFilter::Info).is_ok());

        match check_level(LevelFilter::Warn) {
            Err(LoggerInitError::InvalidMinLogLevel(l)) => assert_eq!(l, LevelFilter::Warn),
            r => panic!("Expected an invalid level error, got {:?}", r),
        }
        assert!(check_level(LevelFilter::Off).is_err());
    }

    #[test]
    fn test_tags() {
        assert_eq!(tag(Level::Warn), "WRN");
        assert_eq!(tag(Level::Trace), "TRC");
        assert_eq!(&*coloured_tag(Level::Debug), "DBG");
    }
}
