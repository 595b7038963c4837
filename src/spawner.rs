//! Installer process spawner.
//!
//! Launches the installer with piped stdin/stdout and binds a
//! [`MachineDialog`] to the pipes. The installer's stderr is inherited so
//! its diagnostics reach the operator unchanged.
//!
//! The child is killed and reaped when its [`InstallerProcess`] is dropped
//! without an explicit [`InstallerProcess::wait`] or
//! [`InstallerProcess::kill`].

use std::io::BufReader;
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};

use tracing::{debug, info, warn};

use crate::config::InstallerConfig;
use crate::mdp::MachineDialog;
use crate::{AppError, Result};

/// Dialog bound to a spawned installer's stdio.
pub type InstallerDialog = MachineDialog<BufReader<ChildStdout>, ChildStdin>;

/// A running installer and the dialog connected to it.
///
/// Field order matters: the dialog (and with it the installer's stdin) is
/// dropped before the child guard.
#[derive(Debug)]
pub struct InstallerProcess {
    /// Dialog over the child's stdout (input) and stdin (output).
    pub dialog: InstallerDialog,
    child: ChildGuard,
}

/// Owns the child until it is reaped.
#[derive(Debug)]
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn reap(&mut self, kill: bool) -> Result<Option<ExitStatus>> {
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };
        if kill {
            if let Err(err) = child.kill() {
                debug!(%err, "installer already exited");
            }
        }
        child
            .wait()
            .map(Some)
            .map_err(|err| AppError::Spawn(format!("failed to wait for installer: {err}")))
    }
}

impl Drop for ChildGuard {
    /// Kill and reap an installer nobody waited for.
    fn drop(&mut self) {
        if let Some(pid) = self.child.as_ref().map(Child::id) {
            warn!(pid, "killing installer on drop");
            if let Err(err) = self.reap(true) {
                warn!(pid, %err, "failed to reap installer");
            }
        }
    }
}

impl InstallerProcess {
    /// OS process id of the installer.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.child.as_ref().map(Child::id)
    }

    /// Close the installer's stdin, wait for it to exit and return its exit
    /// code.
    ///
    /// `None` means the process was terminated by a signal.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Spawn`] if waiting on the child fails.
    pub fn wait(self) -> Result<Option<i32>> {
        self.finish(false)
    }

    /// Kill the installer and reap it.
    ///
    /// Returns the exit code like [`InstallerProcess::wait`]; an installer
    /// that was still running reports `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Spawn`] if waiting on the child fails.
    pub fn kill(self) -> Result<Option<i32>> {
        self.finish(true)
    }

    fn finish(self, kill: bool) -> Result<Option<i32>> {
        let Self { dialog, mut child } = self;
        // An installer blocked on a read sees EOF.
        drop(dialog);

        let code = child.reap(kill)?.and_then(|status| status.code());
        match code {
            Some(0) => info!("installer exited successfully"),
            Some(c) => warn!(exit_code = c, "installer exited with failure"),
            None => warn!("installer terminated by signal"),
        }
        Ok(code)
    }
}

/// Spawn the installer described by `config`.
///
/// # Errors
///
/// - `AppError::Spawn("failed to spawn installer: …")` on OS spawn failure.
/// - `AppError::Spawn("failed to capture installer …")` if a pipe is missing.
pub fn spawn_installer(config: &InstallerConfig) -> Result<InstallerProcess> {
    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args);
    cmd.envs(&config.env);
    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let mut child = cmd
        .spawn()
        .map_err(|err| AppError::Spawn(format!("failed to spawn installer: {err}")))?;

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    // Reaped on the error paths below.
    let guard = ChildGuard { child: Some(child) };

    let stdin = stdin.ok_or_else(|| AppError::Spawn("failed to capture installer stdin".into()))?;
    let stdout =
        stdout.ok_or_else(|| AppError::Spawn("failed to capture installer stdout".into()))?;

    info!(
        command = config.command.as_str(),
        pid = guard.child.as_ref().map(Child::id),
        "installer spawned"
    );

    Ok(InstallerProcess {
        dialog: MachineDialog::new(BufReader::new(stdout), stdin),
        child: guard,
    })
}
