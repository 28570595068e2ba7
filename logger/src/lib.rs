use colored::Colorize;
use log::LevelFilter;

fn level_color(level: log::Level) -> &'static str {
    match level {
        log::Level::Info => "green",
        log::Level::Warn => "yellow",
        log::Level::Error => "red",
        log::Level::Debug => "magenta",
        log::Level::Trace => "bright black",
    }
}

/// Installs the global logger.
///
/// Records go to stdout and, when `log_file` is given, are appended to that
/// file as well. HTTP client internals are silenced.
pub fn setup(log_file: Option<&str>, level: LevelFilter) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                record.target(),
                record.level().to_string().color(level_color(record.level())),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Off)
        .level_for("hyper_util", LevelFilter::Off)
        .level_for("reqwest", LevelFilter::Off)
        .chain(std::io::stdout());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

/// Parses a level name such as `debug`, falling back to `Info`.
pub fn level_from_str(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}
