use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Log output that always goes to stderr and optionally to a file.
///
/// Failing to write the file never fails the log call. The first failure is
/// reported on stderr, later ones are dropped silently.
struct TeeWriter {
    file: Option<File>,
    file_failed: bool,
}

impl TeeWriter {
    fn new(file: Option<File>) -> Self {
        Self {
            file,
            file_failed: false,
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = io::stderr().write_all(buf);
        if let Some(file) = &mut self.file {
            if let Err(e) = file.write_all(buf) {
                if !self.file_failed {
                    eprintln!("Unable to write to log file: {e}");
                    self.file_failed = true;
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        if let Some(file) = &mut self.file {
            let _ = file.flush();
        }
        Ok(())
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn builder(writer: TeeWriter) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now().format("%Y/%m/%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(writer)));
    builder
}

/// Initialize the global logger. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init(log_file: Option<&Path>) {
    let (file, open_error) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    builder(TeeWriter::new(file)).init();

    if let (Some(path), Some(e)) = (log_file, open_error) {
        log::warn!("Unable to open log file {path:?}, logging to stderr only: {e}");
    }
}
