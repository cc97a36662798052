use env_logger::Builder;
use log::LevelFilter;

/// Maps the number of `-v` flags to a level: warnings by default, then info, debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs an stderr logger for the given verbosity. Calling it twice keeps the first logger.
pub fn init(verbosity: u8) {
    Builder::new()
        .filter_level(level_for(verbosity))
        .format_timestamp(None)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(7), LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice() {
        init(2);
        init(0);
        log::debug!("still logging after a second init");
    }
}
