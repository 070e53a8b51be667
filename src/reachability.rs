//! Bounded-wait checks of external resources.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// How long a probe may run before the resource is assumed unreachable.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Something that can tell whether an external resource is available.
///
/// Probes run on a worker thread and may block.
pub trait ResourceProbe: Send + 'static {
    /// Name used in messages.
    fn resource(&self) -> String;

    fn is_reachable(&self) -> bool;
}

/// Probes a file or directory, typically on a network share.
#[derive(Debug, Clone)]
pub struct PathProbe {
    path: PathBuf,
}

impl PathProbe {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResourceProbe for PathProbe {
    fn resource(&self) -> String {
        self.path.display().to_string()
    }

    fn is_reachable(&self) -> bool {
        self.path.exists()
    }
}

/// Runs `probe` on a worker thread and waits at most `timeout` for its
/// answer. A probe that does not answer in time counts as unreachable; its
/// thread is left to finish on its own.
pub fn probe_with_timeout<P: ResourceProbe>(probe: P, timeout: Duration) -> bool {
    let resource = probe.resource();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(probe.is_reachable());
    });
    match rx.recv_timeout(timeout) {
        Ok(reachable) => {
            debug!(%resource, reachable, "probe answered");
            reachable
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(%resource, ?timeout, "probe timed out");
            false
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            warn!(%resource, "probe thread ended without an answer");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct Fixed(bool);

    impl ResourceProbe for Fixed {
        fn resource(&self) -> String {
            "fixed".into()
        }

        fn is_reachable(&self) -> bool {
            self.0
        }
    }

    struct Hanging;

    impl ResourceProbe for Hanging {
        fn resource(&self) -> String {
            "hanging".into()
        }

        fn is_reachable(&self) -> bool {
            thread::sleep(Duration::from_secs(5));
            true
        }
    }

    #[test]
    fn answers_are_passed_through() {
        assert!(probe_with_timeout(Fixed(true), PROBE_TIMEOUT));
        assert!(!probe_with_timeout(Fixed(false), PROBE_TIMEOUT));
    }

    #[test]
    fn slow_probe_counts_as_unreachable() {
        let started = Instant::now();
        assert!(!probe_with_timeout(Hanging, Duration::from_millis(50)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn missing_path_is_unreachable() {
        let probe = PathProbe::new("/definitely/not/a/shared/parameter/file.txt");
        assert!(!probe_with_timeout(probe, PROBE_TIMEOUT));
    }
}
