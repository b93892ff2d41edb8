/*!
 * Driver
 * Interactive line-oriented command loop over the allocator and cache core
 */

use crate::allocator::list::FitStrategy;
use crate::allocator::{Allocator, AllocatorKind};
use crate::cache::{CacheHierarchy, CachePolicy};
use crate::core::types::ALLOC_FAILURE;
use log::info;
use std::io::{self, BufRead, Write};

fn parse_fit(s: &str) -> FitStrategy {
    match s {
        "best" => FitStrategy::Best,
        "worst" => FitStrategy::Worst,
        _ => FitStrategy::First,
    }
}

fn parse_cache_policy(s: &str) -> CachePolicy {
    match s {
        "fifo" => CachePolicy::Fifo,
        "lfu" => CachePolicy::Lfu,
        _ => CachePolicy::Lru,
    }
}

/// Holds the two optional collaborators the commands operate on. Neither
/// exists until the matching `init`/`set` command creates it.
pub struct Driver {
    allocator: Option<AllocatorKind>,
    memory_size: usize,
    cache: Option<CacheHierarchy>,
    cache_policy: CachePolicy,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            allocator: None,
            memory_size: 0,
            cache: None,
            cache_policy: CachePolicy::Lru,
        }
    }

    /// Run the REPL over `input`, writing responses to `output`. Returns on
    /// `exit`/`quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "Memory Simulator")?;
        let mut line = String::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let mut words = line.trim().split_whitespace();
            let Some(cmd) = words.next() else { continue };

            if cmd == "exit" || cmd == "quit" {
                break;
            }

            self.dispatch(cmd, words, &mut output)?;
        }
        Ok(())
    }

    fn dispatch<'a, W: Write>(
        &mut self,
        cmd: &str,
        mut args: impl Iterator<Item = &'a str>,
        out: &mut W,
    ) -> io::Result<()> {
        match cmd {
            "init" => match args.next() {
                Some("memory") => {
                    let size: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                    self.allocator = None;
                    self.memory_size = size;
                    info!("memory arena set to {} bytes", size);
                    writeln!(out, "Initialized memory of size {}", size)?;
                }
                Some("cache") => {
                    self.cache = Some(CacheHierarchy::new(self.cache_policy));
                    writeln!(out, "Cache initialized")?;
                }
                _ => writeln!(out, "Invalid init command")?,
            },

            "set" => {
                let sub = args.next().unwrap_or("");
                let arg = args.next().unwrap_or("");
                match sub {
                    "allocator" => {
                        if self.memory_size == 0 {
                            writeln!(out, "Initialize memory first")?;
                            return Ok(());
                        }
                        self.allocator = match arg {
                            "first" | "best" | "worst" => {
                                Some(AllocatorKind::list(self.memory_size, parse_fit(arg)))
                            }
                            "buddy" => match AllocatorKind::buddy(self.memory_size) {
                                Ok(a) => Some(a),
                                Err(e) => {
                                    writeln!(out, "{}", e)?;
                                    return Ok(());
                                }
                            },
                            _ => {
                                writeln!(out, "Unknown allocator")?;
                                return Ok(());
                            }
                        };
                        writeln!(out, "Allocator set to {}", arg)?;
                    }
                    "policy" => {
                        self.cache_policy = parse_cache_policy(arg);
                        self.cache = Some(CacheHierarchy::new(self.cache_policy));
                        writeln!(out, "Cache policy set to {}", arg)?;
                    }
                    _ => writeln!(out, "Invalid set command")?,
                }
            }

            "malloc" => {
                let Some(allocator) = self.allocator.as_mut() else {
                    writeln!(out, "Allocator not set")?;
                    return Ok(());
                };
                let size: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                let id = allocator.malloc(size);
                if id == ALLOC_FAILURE {
                    writeln!(out, "Allocation failed")?;
                } else {
                    writeln!(out, "Allocated block id={}", id)?;
                }
            }

            "free" => {
                let Some(allocator) = self.allocator.as_mut() else {
                    writeln!(out, "Allocator not set")?;
                    return Ok(());
                };
                let id: i64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                allocator.free(id);
                writeln!(out, "Block {} freed", id)?;
            }

            "dump" => match args.next() {
                Some("memory") => match self.allocator.as_ref() {
                    Some(a) => write!(out, "{}", a.dump())?,
                    None => writeln!(out, "Allocator not set")?,
                },
                Some("cache") => match self.cache.as_ref() {
                    Some(c) => write!(out, "{}", c.dump())?,
                    None => writeln!(out, "Cache not initialized")?,
                },
                _ => writeln!(out, "Invalid dump command")?,
            },

            "stats" => match args.next() {
                Some("memory") => match self.allocator.as_ref() {
                    Some(a) => {
                        let s = a.stats();
                        let report = serde_json::json!({
                            "raw": s,
                            "utilization_pct": s.utilization(),
                            "external_fragmentation_pct": s.external_fragmentation(),
                            "internal_fragmentation_pct": s.internal_fragmentation(),
                            "failure_rate_pct": s.failure_rate(),
                        });
                        writeln!(out, "{}", serde_json::to_string(&report).unwrap_or_default())?;
                    }
                    None => writeln!(out, "Allocator not set")?,
                },
                Some("cache") => match self.cache.as_ref() {
                    Some(c) => {
                        let s = c.stats();
                        let report = serde_json::json!({
                            "raw": s,
                            "l1_hit_rate_pct": s.l1_hit_rate(),
                            "l2_hit_rate_pct": s.l2_hit_rate(),
                            "l3_hit_rate_pct": s.l3_hit_rate(),
                            "overall_hit_rate_pct": s.overall_hit_rate(),
                            "average_access_time_cycles": s.average_access_time(),
                        });
                        writeln!(out, "{}", serde_json::to_string(&report).unwrap_or_default())?;
                    }
                    None => writeln!(out, "Cache not initialized")?,
                },
                _ => writeln!(out, "Invalid stats command")?,
            },

            "access" => {
                let Some(cache) = self.cache.as_mut() else {
                    writeln!(out, "Cache not initialized")?;
                    return Ok(());
                };
                let addr: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                cache.access(addr);
            }

            "enable" => {
                let Some(cache) = self.cache.as_mut() else {
                    writeln!(out, "Cache not initialized")?;
                    return Ok(());
                };
                match args.next() {
                    Some("logs") => {
                        cache.log_mut().enable_console();
                        writeln!(out, "Logs enabled")?;
                    }
                    Some("filelog") => {
                        cache.log_mut().enable_file();
                        writeln!(out, "File logging enabled")?;
                    }
                    _ => writeln!(out, "Unknown enable option")?,
                }
            }

            "disable" => {
                let Some(cache) = self.cache.as_mut() else {
                    writeln!(out, "Cache not initialized")?;
                    return Ok(());
                };
                match args.next() {
                    Some("logs") => {
                        cache.log_mut().disable_console();
                        writeln!(out, "Logs disabled")?;
                    }
                    Some("filelog") => {
                        cache.log_mut().disable_file();
                        writeln!(out, "File logging disabled")?;
                    }
                    _ => writeln!(out, "Unknown disable option")?,
                }
            }

            _ => writeln!(out, "Unknown command")?,
        }
        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}
