use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Overrides the default level when set to `error`, `warn`, `info`, `debug`, `trace` or `off`.
pub const LEVEL_ENV: &str = "POSEBRIDGE_LOG";

const FILE_PREFIX: &str = "posebridge-";

/// Writes every record to stdout.
pub struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_record(record));
    }

    fn flush(&self) {
        io::stdout().flush().ok();
    }
}

/// Appends to `<dir>/posebridge-<YYYY-MM-DD>.log`, starting a new file at UTC midnight.
pub struct FileLogger {
    sink: Mutex<DailyFile>,
}

impl FileLogger {
    /// Create `dir` if needed and open today's file.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self {
            sink: Mutex::new(DailyFile::open(dir.into())?),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = format_record(record);
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        sink.roll();
        if let Err(e) = sink.append(&line) {
            eprintln!("posebridge: log write to {:?} failed: {}", sink.dir, e);
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        sink.file.flush().ok();
    }
}

struct DailyFile {
    dir: PathBuf,
    date: String,
    file: File,
}

impl DailyFile {
    fn open(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let date = format_today();
        let file = Self::open_for(&dir, &date)?;
        Ok(Self { dir, date, file })
    }

    fn open_for(dir: &Path, date: &str) -> io::Result<File> {
        let path = dir.join(format!("{FILE_PREFIX}{date}.log"));
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// Switch to today's file if the date changed. On failure the old file stays in use.
    fn roll(&mut self) {
        let today = format_today();
        if today == self.date {
            return;
        }
        match Self::open_for(&self.dir, &today) {
            Ok(file) => {
                self.file = file;
                self.date = today;
            }
            Err(e) => eprintln!("posebridge: cannot roll log file in {:?}: {}", self.dir, e),
        }
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")
    }
}

/// `timestamp [LEVEL] [thread:id] target file:line - message`
fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {} {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.target(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp() -> String {
    let secs = now_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let (h, m, s) = (secs % 86_400 / 3600, secs % 3600 / 60, secs % 60);
    format!("{year:04}-{month:02}-{day:02}T{h:02}:{m:02}:{s:02}")
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((now_secs() / 86_400) as i64);
    format!("{year:04}-{month:02}-{day:02}")
}

// Howard Hinnant's days-to-civil, http://howardhinnant.github.io/date_algorithms.html
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe as i64 + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Level from `POSEBRIDGE_LOG`, else Debug in debug builds and Info in release.
pub fn max_level() -> LevelFilter {
    std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// Install `StdoutLogger` as the process logger. Later installs are ignored.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level());
    }
}

/// Install a `FileLogger` over `dir` as the process logger.
///
/// Fails if the directory or file cannot be created. When a logger is
/// already installed this succeeds without replacing it.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> io::Result<()> {
    static LOGGER: OnceLock<FileLogger> = OnceLock::new();

    let logger = FileLogger::new(dir)?;
    if LOGGER.set(logger).is_err() {
        return Ok(());
    }
    if let Some(logger) = LOGGER.get() {
        if log::set_logger(logger).is_ok() {
            log::set_max_level(max_level());
        }
    }
    Ok(())
}
