use log::{info, warn};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("crawler is already running")]
    AlreadyRunning,
    #[error("crawler is not running")]
    AlreadyStopped,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Running { pid: u32 },
    Stopped,
}

/// PID file standing in for real process supervision. `start` records a
/// synthetic PID without spawning anything; a future crawler can reuse the
/// same interface with a real one.
pub struct SentinelFile {
    path: PathBuf,
}

impl SentinelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SentinelFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_present(&self) -> bool {
        self.path.exists()
    }

    pub fn start(&self) -> Result<u32, LifecycleError> {
        if self.is_present() {
            return Err(LifecycleError::AlreadyRunning);
        }
        let pid: u32 = rand::thread_rng().gen_range(1000..11000);
        fs::write(&self.path, pid.to_string())?;
        info!("Crawler sentinel created at {} (pid {pid})", self.path.display());
        Ok(pid)
    }

    pub fn stop(&self) -> Result<(), LifecycleError> {
        if !self.is_present() {
            return Err(LifecycleError::AlreadyStopped);
        }
        fs::remove_file(&self.path)?;
        info!("Crawler sentinel removed from {}", self.path.display());
        Ok(())
    }

    pub fn recorded_pid(&self) -> Option<u32> {
        fs::read_to_string(&self.path).ok()?.trim().parse().ok()
    }

    /// Reconciles the sentinel against the OS process table. A recorded PID
    /// that no longer maps to a live process is stale; the file is removed
    /// and the state reported as stopped.
    pub fn status(&self) -> LifecycleState {
        if !self.is_present() {
            return LifecycleState::Stopped;
        }
        match self.recorded_pid() {
            Some(pid) if process_alive(pid) => LifecycleState::Running { pid },
            _ => {
                warn!("Stale crawler sentinel at {}, removing", self.path.display());
                let _ = fs::remove_file(&self.path);
                LifecycleState::Stopped
            }
        }
    }
}

fn process_alive(pid: u32) -> bool {
    if Path::new("/proc").is_dir() {
        return Path::new(&format!("/proc/{pid}")).exists();
    }
    std::process::Command::new("ps")
        .args(["-p", &pid.to_string()])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sentinel(dir: &TempDir) -> SentinelFile {
        SentinelFile::new(dir.path().join("crawler.pid"))
    }

    #[test]
    fn start_records_pid_and_rejects_second_start() {
        let dir = TempDir::new().unwrap();
        let s = sentinel(&dir);

        let pid = s.start().unwrap();
        assert!((1000..11000).contains(&pid));
        assert_eq!(s.recorded_pid(), Some(pid));

        match s.start() {
            Err(LifecycleError::AlreadyRunning) => {}
            other => panic!("expected AlreadyRunning, got {other:?}"),
        }
        // identifier unchanged by the rejected start
        assert_eq!(s.recorded_pid(), Some(pid));
    }

    #[test]
    fn stop_removes_file_and_reports_already_stopped() {
        let dir = TempDir::new().unwrap();
        let s = sentinel(&dir);

        s.start().unwrap();
        s.stop().unwrap();
        assert!(!s.is_present());

        match s.stop() {
            Err(LifecycleError::AlreadyStopped) => {}
            other => panic!("expected AlreadyStopped, got {other:?}"),
        }
    }

    #[test]
    fn status_reports_running_for_live_pid() {
        let dir = TempDir::new().unwrap();
        let s = sentinel(&dir);

        let own = std::process::id();
        fs::write(s.path(), own.to_string()).unwrap();
        assert_eq!(s.status(), LifecycleState::Running { pid: own });
        assert!(s.is_present());
    }

    #[test]
    fn status_self_heals_on_stale_pid() {
        let dir = TempDir::new().unwrap();
        let s = sentinel(&dir);

        fs::write(s.path(), "999999999").unwrap();
        assert_eq!(s.status(), LifecycleState::Stopped);
        assert!(!s.is_present());
    }

    #[test]
    fn status_self_heals_on_garbage_pid() {
        let dir = TempDir::new().unwrap();
        let s = sentinel(&dir);

        fs::write(s.path(), "not-a-pid").unwrap();
        assert_eq!(s.status(), LifecycleState::Stopped);
        assert!(!s.is_present());
    }
}
