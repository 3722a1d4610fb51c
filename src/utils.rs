use std::io;

use crate::config::Config;

pub fn init_logger(config: &Config) -> Result<(), fern::InitError> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.log_level);

    // Log to stderr unless a file is configured; stdout carries the file content.
    let dispatch = match &config.log_file {
        Some(path) => dispatch.chain(fern::log_file(path)?),
        None => dispatch.chain(io::stderr()),
    };
    dispatch.apply()?;
    Ok(())
}
