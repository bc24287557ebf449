//! Logger setup: plain messages on stdout, optionally teed to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

const OWN_CRATES: &[&str] = &[
    "gridframe",
    "gridframe_core",
    "gridframe_overlay",
    "gridframe_scraper",
];

/// Writes log lines to stdout and, when set, to a file with ANSI codes removed.
pub(crate) struct TeeWriter<W: Write> {
    console: W,
    file: Option<File>,
}

impl<W: Write> TeeWriter<W> {
    pub(crate) fn new(console: W, file: Option<File>) -> Self {
        Self { console, file }
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

/// Level for the gridframe crates given the global flags.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG` still applies on top of the flags.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let file = logfile.map(File::create).transpose()?;
    let level = level_for(quiet, verbose);

    let mut builder = env_logger::Builder::new();
    // Dependencies stay at warn unless asked for via RUST_LOG
    builder.filter_level(LevelFilter::Warn.min(level));
    for name in OWN_CRATES {
        builder.filter_module(name, level);
    }
    builder.parse_default_env();

    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder
        .target(env_logger::Target::Pipe(Box::new(TeeWriter::new(
            io::stdout(),
            file,
        ))))
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false), LevelFilter::Warn);
        assert_eq!(level_for(false, true), LevelFilter::Debug);
        // verbose wins
        assert_eq!(level_for(true, true), LevelFilter::Debug);
    }

    #[test]
    fn test_tee_strips_ansi_from_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut console = Vec::new();
        {
            let file = File::create(&path).unwrap();
            let mut tee = TeeWriter::new(&mut console, Some(file));
            tee.write_all(b"\x1b[32mSaved\x1b[0m Halo\n").unwrap();
            tee.flush().unwrap();
        }

        assert_eq!(console, b"\x1b[32mSaved\x1b[0m Halo\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Saved Halo\n");
    }
}
