//! Process runtime statistics: uptime and memory counters.
//!
//! Handlers read these through the [`RuntimeStats`] trait so tests can supply
//! fixed values instead of a live process.

use std::time::{Duration, Instant};

use sysinfo::{Pid, System};
use tracing::debug;

use crate::error::StatsError;

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// Memory counters in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Memory in use by the process (resident).
    pub heap_used: u64,
    /// Memory reserved by the process (virtual).
    pub heap_total: u64,
    /// Resident set size.
    pub rss: u64,
}

/// Source of process uptime and memory counters.
pub trait RuntimeStats: Send + Sync {
    /// Time since the process started.
    fn uptime(&self) -> Duration;

    /// Current memory counters.
    fn memory(&self) -> Result<MemoryUsage, StatsError>;
}

/// Stats for the running process, sampled through `sysinfo`.
#[derive(Debug, Clone)]
pub struct ProcessStats {
    pid: Pid,
    created_at: Instant,
}

impl ProcessStats {
    /// Stats for the current process.
    pub fn current() -> Result<Self, StatsError> {
        let pid = sysinfo::get_current_pid().map_err(StatsError::CurrentPid)?;
        Ok(Self {
            pid,
            created_at: Instant::now(),
        })
    }

    // A fresh `System` per sample keeps the provider free of shared mutable state.
    fn sample<T>(&self, read: impl FnOnce(&sysinfo::Process) -> T) -> Result<T, StatsError> {
        let mut system = System::new();
        if !system.refresh_process(self.pid) {
            return Err(StatsError::ProcessNotFound(self.pid.as_u32()));
        }
        system
            .process(self.pid)
            .map(read)
            .ok_or(StatsError::ProcessNotFound(self.pid.as_u32()))
    }
}

impl RuntimeStats for ProcessStats {
    fn uptime(&self) -> Duration {
        match self.sample(|process| process.run_time()) {
            Ok(seconds) => Duration::from_secs(seconds),
            Err(err) => {
                debug!("process run time unavailable, using provider age: {}", err);
                self.created_at.elapsed()
            }
        }
    }

    fn memory(&self) -> Result<MemoryUsage, StatsError> {
        self.sample(|process| MemoryUsage {
            heap_used: process.memory(),
            heap_total: process.virtual_memory(),
            rss: process.memory(),
        })
    }
}

/// Format whole seconds as `"{h}h {m}m {s}s"`.
pub fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

/// Convert bytes to megabytes, rounding to nearest (halves up).
pub fn bytes_to_megabytes(bytes: u64) -> u64 {
    (bytes + BYTES_PER_MEGABYTE / 2) / BYTES_PER_MEGABYTE
}

/// Runtime identification string, e.g. `house_arena_api 1.1.0 (linux/x86_64)`.
pub fn runtime_version() -> String {
    format!(
        "{} {} ({}/{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
