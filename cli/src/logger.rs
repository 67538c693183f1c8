use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;

pub struct SimpleLogger;

impl Log for SimpleLogger {
  fn enabled(&self, _metadata: &Metadata) -> bool {
    true
  }

  fn log(&self, record: &Record) {
    // Output goes to stdout, so diagnostics stay on stderr.
    eprintln!("[{}][{}] {}", record.level(), record.target(), record.args());
  }

  fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
  static LOGGER: SimpleLogger = SimpleLogger;
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
