//! Recovery Controller
//!
//! Fail-fast handling for write faults. On a memory-constrained target with
//! no remote operator, a wedged or exhausted store is worse than a clean
//! wipe: the production policy erases the whole storage partition and
//! cold-restarts the device, sacrificing every session to guarantee a
//! usable future state.
//!
//! ## State machine
//! ```text
//! Normal ──(first write fault)──▶ Recovering (terminal)
//! ```
//! The first fault wins the transition and runs the configured
//! [`FaultPolicy`] exactly once. `Recovering` is terminal: the process is
//! expected not to return from the production policy, and if a policy does
//! return (log-only, tests) every subsequent writer call fails with
//! `Recovering` until the device restarts.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Device primitives consumed by the wipe+restart policy
///
/// On the real target these wrap the flash-area erase and cold-reboot
/// syscalls; hosted builds use [`HostPlatform`].
pub trait Platform: Send + Sync {
    /// Erase the entire storage partition backing all streams
    fn erase_storage_partition(&self) -> io::Result<()>;

    /// Cold-restart the device
    ///
    /// Expected not to return in production. Test platforms may return, in
    /// which case the controller stays in `Recovering`.
    fn cold_restart(&self);
}

/// Pluggable strategy invoked on the first write fault
pub trait FaultPolicy: Send + Sync {
    fn on_write_fault(&self, fault: &io::Error);
}

/// Production policy: partition-wide erase, then cold restart
///
/// There is no per-file or partial-recovery path by design — correctness of
/// future sessions is valued over preservation of the session that faulted.
pub struct WipeRestart<P: Platform> {
    platform: P,
}

impl<P: Platform> WipeRestart<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }
}

impl<P: Platform> FaultPolicy for WipeRestart<P> {
    fn on_write_fault(&self, fault: &io::Error) {
        tracing::error!(error = %fault, "write fault, erasing storage partition");
        if let Err(err) = self.platform.erase_storage_partition() {
            // Nothing left to try; the restart below is the last resort
            tracing::error!(error = %err, "partition erase failed");
        }

        tracing::error!("restarting device");
        self.platform.cold_restart();
    }
}

/// Log the fault and carry on (bring-up, tests)
///
/// Leaves the controller in `Recovering`, so writes still stop; the device
/// just isn't wiped.
pub struct LogOnly;

impl FaultPolicy for LogOnly {
    fn on_write_fault(&self, fault: &io::Error) {
        tracing::error!(error = %fault, "write fault (log-only policy, store disabled)");
    }
}

/// [`Platform`] for hosted targets
///
/// "Partition erase" removes every entry under the mount directory;
/// "cold restart" exits the process and leaves the actual restart to the
/// supervisor. Embedded integrators implement [`Platform`] over their
/// flash-area and reboot primitives instead.
pub struct HostPlatform {
    mount_dir: PathBuf,
}

impl HostPlatform {
    pub fn new(mount_dir: PathBuf) -> Self {
        Self { mount_dir }
    }
}

impl Platform for HostPlatform {
    fn erase_storage_partition(&self) -> io::Result<()> {
        for entry in std::fs::read_dir(&self.mount_dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.metadata()?.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn cold_restart(&self) {
        std::process::exit(1);
    }
}

/// Two-state fault controller shared by all writer-side paths
pub struct RecoveryController {
    recovering: AtomicBool,
    policy: Box<dyn FaultPolicy>,
}

impl RecoveryController {
    pub fn new(policy: Box<dyn FaultPolicy>) -> Self {
        Self {
            recovering: AtomicBool::new(false),
            policy,
        }
    }

    /// Whether the terminal `Recovering` state has been entered
    pub fn is_recovering(&self) -> bool {
        self.recovering.load(Ordering::SeqCst)
    }

    /// Transition `Normal → Recovering` and run the policy
    ///
    /// Only the first caller runs the policy; late faults are logged and
    /// dropped.
    pub fn engage(&self, fault: &io::Error) {
        if self.recovering.swap(true, Ordering::SeqCst) {
            tracing::warn!(error = %fault, "write fault while already recovering");
            return;
        }

        self.policy.on_write_fault(fault);
    }
}
