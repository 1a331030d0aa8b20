use colored::{Color, Colorize};
use log::{Level, LevelFilter, SetLoggerError};

pub fn base(level: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new().level(level)
}

pub fn stderr(base: fern::Dispatch) -> fern::Dispatch {
    base.format(move |out, message, record| {
        let level = record.level();
        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Blue,
            Level::Debug => Color::Magenta,
            Level::Trace => Color::Green,
        };
        let prefix = format!("{}:", level.to_string().to_lowercase());
        out.finish(format_args!(
            "{} [{}] {}",
            prefix.color(color),
            record.target(),
            message
        ))
    })
    .chain(std::io::stderr())
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    stderr(base(level)).apply()
}
