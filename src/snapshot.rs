//! Point-in-time process liveness data and its source.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sysinfo::{Pid, System};

/// Process liveness data captured at the moment a request is handled.
///
/// Never cached across requests — the responder asks its [`SnapshotSource`]
/// for a fresh value on every invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProcessSnapshot {
    /// How long the current process has been running.
    pub uptime: Duration,
    /// Memory held by the current process, in bytes.
    pub private_memory_used: u64,
}

/// Supplies a [`ProcessSnapshot`] once per health-check invocation.
///
/// The default implementation is [`SystemProbe`]. Swap in your own (via
/// [`Responder::with_source`](crate::Responder::with_source)) to report
/// container-level numbers, or a fixed value in tests:
///
/// ```rust
/// use std::time::Duration;
/// use vitals::{ProcessSnapshot, SnapshotSource};
///
/// struct Fixed;
///
/// impl SnapshotSource for Fixed {
///     fn snapshot(&self) -> ProcessSnapshot {
///         ProcessSnapshot { uptime: Duration::from_millis(100), private_memory_used: 200 }
///     }
/// }
/// ```
pub trait SnapshotSource: Send + Sync + 'static {
    /// Returns current liveness data. Expected to be cheap and non-blocking.
    fn snapshot(&self) -> ProcessSnapshot;
}

/// Default snapshot source: reads the current process via `sysinfo`.
///
/// Memory is the process's resident set size. Uptime is wall-clock time since
/// the process start time the kernel reports.
pub struct SystemProbe {
    pid: Pid,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self { pid: Pid::from_u32(std::process::id()) }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for SystemProbe {
    fn snapshot(&self) -> ProcessSnapshot {
        let mut system = System::new();
        system.refresh_process(self.pid);

        match system.process(self.pid) {
            Some(process) => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                // start_time() is seconds since the unix epoch.
                let uptime = Duration::from_secs(now.saturating_sub(process.start_time()));

                ProcessSnapshot { uptime, private_memory_used: process.memory() }
            }
            // The current process is always visible to itself; this arm only
            // guards against a restricted /proc.
            None => ProcessSnapshot { uptime: Duration::ZERO, private_memory_used: 0 },
        }
    }
}
