use std::fmt;
use std::sync::Arc;

use getset::Getters;
use serde::Serialize;

use crate::abs_path::AbsPathBuf;
use crate::automation::{AutomationOutcome, AutomationSession, AutomationStrategy};
use crate::config::{Config, StrategyKind};
use crate::model::ParsedProblem;
use crate::report::{MessageLog, Reporter, Toast};
use crate::stage::{Browser, Clipboard, SystemBrowser, SystemClipboard};
use crate::{problem_url, submit_url};

static MANUAL_INSTRUCTION: &str = "Code copied. Paste it into the editor and press Submit.";

/// Steps of one submission, in the order they are entered.
#[derive(
    Serialize, EnumVariantNames, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SubmitState {
    Idle,
    Parsing,
    ReadingFile,
    Staging,
    Rewriting,
    OpeningBrowser,
    Automating,
    ManualFallback,
    Done,
    Failed,
}

impl fmt::Display for SubmitState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}

#[derive(
    Serialize, EnumVariantNames, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    FileUnreadable,
    SourceNotUtf8,
    EmptySource,
    ClipboardFailed,
    UrlUnrecognized,
    BrowserOpenFailed,
    AutomationToolMissing,
    AutomationProcessFailed,
}

impl IssueKind {
    /// Whether the issue ends the submission in `Failed`.
    pub fn is_fatal(self) -> bool {
        match self {
            Self::FileUnreadable
            | Self::EmptySource
            | Self::ClipboardFailed
            | Self::BrowserOpenFailed => true,
            Self::SourceNotUtf8
            | Self::UrlUnrecognized
            | Self::AutomationToolMissing
            | Self::AutomationProcessFailed => false,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}

#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct Issue {
    kind: IssueKind,
    message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : {}", self.kind, self.message)
    }
}

/// A source file to submit and the problem it solves.
#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct SubmitRequest {
    source_path: AbsPathBuf,
    problem_url: String,
}

impl SubmitRequest {
    pub fn new(source_path: AbsPathBuf, problem_url: impl Into<String>) -> Self {
        Self {
            source_path,
            problem_url: problem_url.into(),
        }
    }
}

/// Everything observed while handling one request.
#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct SubmitReport {
    request: SubmitRequest,
    problem: Option<ParsedProblem>,
    target: Option<String>,
    strategy: StrategyKind,
    state: SubmitState,
    trail: Vec<SubmitState>,
    issues: Vec<Issue>,
    automation: Option<AutomationOutcome>,
}

impl SubmitReport {
    fn new(request: &SubmitRequest, strategy: StrategyKind) -> Self {
        Self {
            request: request.clone(),
            problem: None,
            target: None,
            strategy,
            state: SubmitState::Idle,
            trail: vec![SubmitState::Idle],
            issues: Vec::new(),
            automation: None,
        }
    }

    fn enter(&mut self, state: SubmitState) {
        self.state = state;
        self.trail.push(state);
    }

    fn add_issue(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(Issue {
            kind,
            message: message.into(),
        });
        if kind.is_fatal() {
            self.enter(SubmitState::Failed);
        }
    }

    /// Records the end of the automation session and moves to `Done`.
    pub fn complete(&mut self, outcome: AutomationOutcome) {
        if self.state != SubmitState::Automating {
            return;
        }
        self.automation = Some(outcome);
        if !outcome.is_success() {
            self.add_issue(
                IssueKind::AutomationProcessFailed,
                format!("Automation {}", outcome),
            );
        }
        self.enter(SubmitState::Done);
    }

    pub fn is_failed(&self) -> bool {
        self.state == SubmitState::Failed
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }
}

impl fmt::Display for SubmitReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let problem = self.problem.clone().unwrap_or_default();
        writeln!(f, "{}", problem.headline())?;
        if let Some(target) = &self.target {
            writeln!(f, "Submit page : {}", target)?;
        }
        writeln!(f, "Strategy    : {}", self.strategy)?;
        if let Some(outcome) = self.automation {
            writeln!(f, "Automation  : {}", outcome)?;
        }
        for issue in &self.issues {
            writeln!(f, "Issue       : {}", issue)?;
        }
        write!(f, "State       : {}", self.state)
    }
}

/// Submits source files through the browser.
///
/// Holds at most one automation session; a new submission terminates the previous one.
pub struct Submitter {
    reporter: Reporter,
    clipboard: Box<dyn Clipboard>,
    browser: Box<dyn Browser>,
    strategy: AutomationStrategy,
    problem: ParsedProblem,
    session: Option<AutomationSession>,
}

impl Submitter {
    /// Builds a submitter on the system clipboard and browser.
    ///
    /// The automation strategy is detected here, once.
    pub fn new(conf: &Config, log: Arc<dyn MessageLog>, toast: Arc<dyn Toast>) -> Self {
        Self {
            reporter: Reporter::new(log, toast, conf.show_toast_messages()),
            clipboard: Box::new(SystemClipboard::new()),
            browser: Box::new(SystemBrowser),
            strategy: AutomationStrategy::from_config(conf.automation()),
            problem: ParsedProblem::default(),
            session: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn with_browser(mut self, browser: impl Browser + 'static) -> Self {
        self.browser = Box::new(browser);
        self
    }

    pub fn with_strategy(mut self, strategy: AutomationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> &AutomationStrategy {
        &self.strategy
    }

    /// Identifiers of the latest submission, empty if its url was not recognized.
    pub fn problem(&self) -> &ParsedProblem {
        &self.problem
    }

    /// Copies the source to the clipboard, opens the submit page and starts automation.
    ///
    /// Never fails: problems are reported to the message log and toasts, and recorded in the report.
    /// Returns once automation has been started; its end is reported in the background
    /// and can be awaited with `wait_automation`.
    pub async fn submit(&mut self, request: &SubmitRequest) -> SubmitReport {
        let mut report = SubmitReport::new(request, self.strategy.kind());
        self.reporter.info("Preparing browser submission...");

        report.enter(SubmitState::Parsing);
        self.problem = match problem_url::parse(request.problem_url()) {
            Some(problem) => {
                report.problem = Some(problem.clone());
                problem
            }
            None => {
                let message = format!("Could not recognize problem url : {}", request.problem_url());
                self.reporter.warn(&message);
                report.add_issue(IssueKind::UrlUnrecognized, message);
                ParsedProblem::default()
            }
        };
        self.reporter.set_problem(&self.problem);

        report.enter(SubmitState::ReadingFile);
        let bytes = match request.source_path().read() {
            Ok(bytes) => bytes,
            Err(err) => {
                let message = format!("Failed to read source file: {}", request.source_path());
                self.reporter.error(&format!("{} ({:#})", message, err));
                report.add_issue(IssueKind::FileUnreadable, message);
                return report;
            }
        };
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(err) => {
                // invalid sequences become U+FFFD; the rest is staged unchanged
                let message = format!(
                    "Source file is not valid UTF-8, invalid bytes were replaced: {}",
                    request.source_path()
                );
                self.reporter.warn(&message);
                report.add_issue(IssueKind::SourceNotUtf8, message);
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        if source.trim().is_empty() {
            let message = format!("Found empty source file: {}", request.source_path());
            self.reporter.error(&message);
            report.add_issue(IssueKind::EmptySource, message);
            return report;
        }

        report.enter(SubmitState::Staging);
        // the previous script must not paste the new code into its own page
        self.release_session().await;
        if let Err(err) = self.clipboard.set_text(&source) {
            let message = format!("Failed to copy code to clipboard: {:#}", err);
            self.reporter.error(&message);
            report.add_issue(IssueKind::ClipboardFailed, message);
            return report;
        }
        self.reporter.info("Code copied to clipboard.");

        report.enter(SubmitState::Rewriting);
        let target = submit_url::rewrite(request.problem_url());
        report.target = Some(target.clone());

        report.enter(SubmitState::OpeningBrowser);
        if let Err(err) = self.browser.open(&target) {
            self.reporter.error(&format!("Failed to open browser. ({:#})", err));
            self.reporter.notify("Failed to open browser");
            report.add_issue(IssueKind::BrowserOpenFailed, "Failed to open browser.");
            return report;
        }
        self.reporter.info(&format!("Browser opened to: {}", target));
        self.reporter.notify("Copied & Opened Browser");

        let script = match self.strategy.script() {
            Some(script) => script,
            None => {
                report.enter(SubmitState::ManualFallback);
                report.add_issue(
                    IssueKind::AutomationToolMissing,
                    "No automation tool available",
                );
                self.reporter.info(MANUAL_INSTRUCTION);
                self.reporter.notify(MANUAL_INSTRUCTION);
                report.enter(SubmitState::Done);
                return report;
            }
        };

        report.enter(SubmitState::Automating);
        let reporter = self.reporter.clone();
        match AutomationSession::spawn(script, move |outcome| report_outcome(&reporter, outcome)) {
            Ok(session) => {
                self.reporter
                    .info(&format!("Started automation ({})", self.strategy));
                self.session = Some(session);
            }
            Err(err) => {
                self.reporter.error(&format!("{:#}", err));
                let outcome = AutomationOutcome::Failed { code: None };
                report_outcome(&self.reporter, outcome);
                report.complete(outcome);
            }
        }
        report
    }

    /// Waits for the automation session of the latest submission, if any is running.
    pub async fn wait_automation(&mut self) -> Option<AutomationOutcome> {
        match self.session.take() {
            Some(session) => Some(session.wait().await),
            None => None,
        }
    }

    async fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.terminate().await;
        }
    }
}

fn report_outcome(reporter: &Reporter, outcome: AutomationOutcome) {
    match outcome {
        AutomationOutcome::Succeeded => {
            reporter.info("Automation finished. Check the verdict on the judge.");
            reporter.notify("Submitted through the browser");
        }
        AutomationOutcome::Failed { .. } => {
            reporter.warn(&format!(
                "Automation {}. Check the browser and submit manually.",
                outcome
            ));
            reporter.notify("Automation did not finish. Check the browser manually");
        }
        AutomationOutcome::Terminated => {
            reporter.warn("Automation was terminated before it finished.");
        }
    }
}
