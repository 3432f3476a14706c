use evlog::{LogEventConsolePrinter, Logger};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<Logger> = OnceCell::new();

pub fn set_logger(logger: Logger) {
    let _ = LOGGER.set(logger);
}

pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| {
        let mut logger = Logger::default();
        logger.register(LogEventConsolePrinter::default());
        logger
    })
}
