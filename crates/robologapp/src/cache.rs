//! # Read Cache
//!
//! Full-sheet reads are the expensive, rate-limited call against the workbook.
//! [`ReadCache`] memoizes them per sheet title for a fixed time-to-live.
//!
//! ## Retry Discipline
//!
//! Only rate-limit failures are retried, and only here. Each retry waits
//! `base_delay * 2^attempt` (2 s then 4 s with the defaults). The wait is a
//! blocking sleep on the calling thread. When every attempt is throttled the
//! fetch yields an empty table plus a warning instead of an error, so a listing
//! degrades to "nothing to show" rather than aborting. Exhausted results are not
//! memoized: the next fetch goes back to the backend.
//!
//! Any other backend error propagates on the first attempt.
//!
//! ## Invalidation
//!
//! Coarse by default: the workbook clears the whole cache after every mutation.
//! [`ReadCache::invalidate`] drops a single sheet for callers that know better.

use crate::error::Result;
use crate::record::Table;
use crate::store::RecordStore;
use log::{debug, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Wait before retrying after the given 0-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(Duration::MAX)
    }
}

struct CachedSheet {
    table: Table,
    fetched_at: Instant,
}

pub struct ReadCache {
    ttl: Duration,
    retry: RetryPolicy,
    entries: HashMap<String, CachedSheet>,
    warnings: Vec<String>,
}

impl Default for ReadCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, RetryPolicy::default())
    }
}

impl ReadCache {
    pub fn new(ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            ttl,
            retry,
            entries: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Whether a fresh copy of the sheet is held.
    pub fn is_cached(&self, sheet: &str) -> bool {
        self.entries
            .get(sheet)
            .map(|entry| entry.fetched_at.elapsed() < self.ttl)
            .unwrap_or(false)
    }

    pub fn fetch<S: RecordStore>(&mut self, store: &S, sheet: &str) -> Result<Table> {
        if let Some(entry) = self.entries.get(sheet) {
            if entry.fetched_at.elapsed() < self.ttl {
                debug!("cache hit for '{}'", sheet);
                return Ok(entry.table.clone());
            }
        }

        let attempts = self.retry.max_attempts.max(1);
        for attempt in 0..attempts {
            match store.fetch_all(sheet) {
                Ok(table) => {
                    self.entries.insert(
                        sheet.to_string(),
                        CachedSheet {
                            table: table.clone(),
                            fetched_at: Instant::now(),
                        },
                    );
                    return Ok(table);
                }
                Err(e) if e.is_rate_limited() => {
                    if attempt + 1 < attempts {
                        let wait = self.retry.delay_for(attempt);
                        let message = format!(
                            "Rate limit reached. Waiting {} seconds... (Attempt {}/{})",
                            wait.as_secs(),
                            attempt + 1,
                            attempts
                        );
                        warn!("{}: {}", sheet, message);
                        self.warnings.push(message);
                        std::thread::sleep(wait);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        let message = "Rate limit exceeded. Please wait a minute and refresh.".to_string();
        warn!("{}: {}", sheet, message);
        self.warnings.push(message);
        Ok(Table::empty(sheet))
    }

    pub fn invalidate(&mut self, sheet: &str) {
        self.entries.remove(sheet);
    }

    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!("clearing {} cached sheet(s)", self.entries.len());
        }
        self.entries.clear();
    }

    /// Warnings raised by fetches since the last drain, oldest first.
    pub fn drain_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
