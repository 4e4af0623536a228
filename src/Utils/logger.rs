use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// log level for the `verbose` setting: 0 warnings, 1 step summaries, 2 and above per-level details
pub fn level_for_verbose(verbose: usize) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Terminal logger for the binary and the demos. A second call leaves the first logger in place.
pub fn init_logger(verbose: usize) {
    let level = level_for_verbose(verbose);
    if TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        log::debug!("logger already initialised");
    }
}
