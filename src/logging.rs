/*!
 * Access Log
 * Per-hierarchy sink for the cache's human-readable access trace
 *
 * Distinct from the crate-wide `log`/`env_logger` diagnostics: this sink is
 * owned by a single [`crate::cache::CacheHierarchy`] instance, is toggled at
 * runtime by the driver's `enable`/`disable` commands, and optionally
 * mirrors every line to a trace file.
 */

use log::warn;
use std::fs::{File, OpenOptions};
use std::io::Write;

const DEFAULT_LOG_PATH: &str = "cache_log.txt";

pub struct AccessLog {
    console: bool,
    file: Option<File>,
    file_enabled: bool,
    path: String,
}

impl AccessLog {
    pub fn new() -> Self {
        Self {
            console: false,
            file: None,
            file_enabled: false,
            path: DEFAULT_LOG_PATH.to_string(),
        }
    }

    pub fn enable_console(&mut self) {
        self.console = true;
    }

    pub fn disable_console(&mut self) {
        self.console = false;
    }

    pub fn enable_file(&mut self) {
        if self.file.is_none() {
            match OpenOptions::new().create(true).append(true).open(&self.path) {
                Ok(f) => self.file = Some(f),
                Err(e) => {
                    warn!("could not open access trace file {}: {}", self.path, e);
                    return;
                }
            }
        }
        self.file_enabled = true;
    }

    pub fn disable_file(&mut self) {
        self.file_enabled = false;
    }

    /// Emit one trace line to whichever sinks are currently enabled.
    pub fn record(&mut self, line: &str) {
        if self.console {
            println!("{}", line);
        }
        if self.file_enabled {
            if let Some(f) = self.file.as_mut() {
                if let Err(e) = writeln!(f, "{}", line) {
                    warn!("failed writing to access trace file: {}", e);
                }
            }
        }
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new()
    }
}
