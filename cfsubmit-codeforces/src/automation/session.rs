use std::fmt;
use std::io;
use std::process::ExitStatus;

use anyhow::Context as _;
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::automation::AutomationScript;
use crate::Result;

/// How one automation process ended. Exactly one is produced per session.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum AutomationOutcome {
    Succeeded,
    /// Exited unsuccessfully, could not be waited on, or could not be started.
    Failed { code: Option<i32> },
    /// Killed before it finished, by a newer submission or by dropping the session.
    Terminated,
}

impl AutomationOutcome {
    fn from_status(status: io::Result<ExitStatus>) -> Self {
        match status {
            Ok(status) if status.success() => Self::Succeeded,
            Ok(status) => Self::Failed {
                code: status.code(),
            },
            Err(_) => Self::Failed { code: None },
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Succeeded
    }
}

impl fmt::Display for AutomationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed { code: Some(code) } => write!(f, "failed with exit code {}", code),
            Self::Failed { code: None } => write!(f, "failed"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// A running automation process.
///
/// The process is killed when the session is terminated or dropped,
/// so owning the session is owning the process.
#[derive(Debug)]
pub struct AutomationSession {
    kill_tx: Option<oneshot::Sender<()>>,
    outcome_rx: Option<oneshot::Receiver<AutomationOutcome>>,
    watcher: Option<JoinHandle<()>>,
}

impl AutomationSession {
    /// Starts `script` and watches it in the background.
    ///
    /// `on_complete` is called exactly once, from the watcher task, when the process ends.
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(script: &AutomationScript, on_complete: F) -> Result<Self>
    where
        F: FnOnce(AutomationOutcome) + Send + 'static,
    {
        let mut child = script
            .command()
            .spawn()
            .with_context(|| format!("Could not start automation : {}", script))?;
        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let watcher = tokio::spawn(async move {
            let outcome = tokio::select! {
                // an exit that raced with the kill request still counts as the real outcome
                biased;
                status = child.wait() => AutomationOutcome::from_status(status),
                // resolves on an explicit kill and when the session is dropped
                _ = kill_rx => {
                    child.kill().await.unwrap_or(());
                    AutomationOutcome::Terminated
                }
            };
            on_complete(outcome);
            outcome_tx.send(outcome).unwrap_or(());
        });

        Ok(Self {
            kill_tx: Some(kill_tx),
            outcome_rx: Some(outcome_rx),
            watcher: Some(watcher),
        })
    }

    /// Waits until the process exits by itself.
    pub async fn wait(mut self) -> AutomationOutcome {
        match self.outcome_rx.take() {
            Some(outcome_rx) => outcome_rx.await.unwrap_or(AutomationOutcome::Terminated),
            None => AutomationOutcome::Terminated,
        }
    }

    /// Kills the process if it is still running and waits until it is reaped.
    ///
    /// Returns the real outcome if the process had already finished.
    pub async fn terminate(mut self) -> AutomationOutcome {
        if let Some(kill_tx) = self.kill_tx.take() {
            kill_tx.send(()).unwrap_or(());
        }
        if let Some(watcher) = self.watcher.take() {
            watcher.await.unwrap_or(());
        }
        self.wait().await
    }
}
