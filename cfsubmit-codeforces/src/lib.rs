#![warn(clippy::all)]

#[macro_use]
extern crate strum;

pub mod automation;
pub mod problem_url;
mod report;
mod stage;
pub mod submit_url;
mod submitter;

use cfsubmit_config as config;
use cfsubmit_util::{abs_path, console, model};

pub use automation::{AutomationOutcome, AutomationScript, AutomationSession, AutomationStrategy};
pub use report::{Level, MessageLog, NotificationEvent, Toast};
pub use stage::{Browser, Clipboard, SystemBrowser, SystemClipboard};
pub use submitter::{Issue, IssueKind, SubmitReport, SubmitRequest, SubmitState, Submitter};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;
