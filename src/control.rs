use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

/// Why a session ended. Reported in the summary; an error-budget stop is
/// deliberately distinct from a user-initiated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested duration elapsed.
    Completed,
    /// The running flag was cleared externally (listener thread, Ctrl handler).
    Interrupted,
    /// The sentinel file was found and consumed.
    KillSwitch,
    /// `error_count` reached `max_errors`.
    ErrorLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Completed => "completed",
            StopReason::Interrupted => "interrupted",
            StopReason::KillSwitch => "kill switch",
            StopReason::ErrorLimit => "error limit",
        };
        write!(f, "{}", s)
    }
}

/// Shared running flag: one writer (whoever requests the stop), one reader
/// (the simulation thread). Checked at loop checkpoints only, never inside
/// a sleep, so cancellation is cooperative and takes effect at the next
/// boundary.
#[derive(Debug, Clone)]
pub struct StopToken {
    running: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for StopToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Polled file-system stop marker. `triggered` consumes the marker: once the
/// file is seen it is deleted, so a second session does not stop immediately
/// on a stale file.
#[derive(Debug, Clone)]
pub struct KillSwitch {
    path: PathBuf,
}

impl KillSwitch {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn triggered(&self) -> bool {
        if !self.path.exists() {
            return false;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not remove kill switch file");
        }
        true
    }
}
