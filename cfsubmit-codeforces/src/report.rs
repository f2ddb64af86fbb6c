use std::fmt;
use std::io::Write as _;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::console::{sty_bold, sty_dim, Console};
use crate::model::ParsedProblem;

#[derive(Serialize, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}

/// Receives progress messages. Messages are always delivered, regardless of toast settings.
pub trait MessageLog: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Shows notifications to the user, e.g. as desktop toasts.
pub trait Toast: Send + Sync {
    fn toast(&self, event: &NotificationEvent);
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationEvent {
    pub headline: String,
    pub body: String,
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", sty_bold(&self.headline), self.body)
    }
}

impl MessageLog for Mutex<Console> {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut cnsl) = self.lock() {
            match level {
                Level::Info => cnsl.info(message),
                Level::Warn => cnsl.warn(message),
                Level::Error => cnsl.error(message),
            }
            .unwrap_or(());
        }
    }
}

impl Toast for Mutex<Console> {
    fn toast(&self, event: &NotificationEvent) {
        if let Ok(mut cnsl) = self.lock() {
            writeln!(cnsl, "{} {}", sty_dim(">>"), event).unwrap_or(());
        }
    }
}

/// Message log and toast sink bound to the problem of one submission.
///
/// Cloned into the automation watcher, so that completion is reported
/// with the same headline after `submit` has returned.
#[derive(Clone)]
pub(crate) struct Reporter {
    log: Arc<dyn MessageLog>,
    toast: Arc<dyn Toast>,
    show_toast_messages: bool,
    headline: String,
}

impl Reporter {
    pub fn new(log: Arc<dyn MessageLog>, toast: Arc<dyn Toast>, show_toast_messages: bool) -> Self {
        Self {
            log,
            toast,
            show_toast_messages,
            headline: ParsedProblem::default().headline(),
        }
    }

    pub fn set_problem(&mut self, problem: &ParsedProblem) {
        self.headline = problem.headline();
    }

    pub fn info(&self, message: &str) {
        self.log.log(Level::Info, message)
    }

    pub fn warn(&self, message: &str) {
        self.log.log(Level::Warn, message)
    }

    pub fn error(&self, message: &str) {
        self.log.log(Level::Error, message)
    }

    pub fn notify(&self, body: &str) {
        if !self.show_toast_messages {
            return;
        }
        self.toast.toast(&NotificationEvent {
            headline: self.headline.clone(),
            body: body.to_owned(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::console::ConsoleConfig;

    /// Records everything it receives, in order.
    #[derive(Default)]
    pub struct Recorder {
        pub messages: Mutex<Vec<(Level, String)>>,
        pub events: Mutex<Vec<NotificationEvent>>,
    }

    impl Recorder {
        pub fn messages(&self) -> Vec<(Level, String)> {
            self.messages.lock().unwrap().clone()
        }

        pub fn events(&self) -> Vec<NotificationEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn has_message(&self, level: Level, pat: &str) -> bool {
            self.messages()
                .iter()
                .any(|(l, message)| *l == level && message.contains(pat))
        }
    }

    impl MessageLog for Recorder {
        fn log(&self, level: Level, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((level, message.to_owned()));
        }
    }

    impl Toast for Recorder {
        fn toast(&self, event: &NotificationEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_notify_uses_problem_headline() {
        let recorder = Arc::new(Recorder::default());
        let mut reporter = Reporter::new(recorder.clone(), recorder.clone(), true);
        reporter.set_problem(&ParsedProblem::new("1500", "C1"));
        reporter.notify("Copied & Opened Browser");
        reporter.info("Code copied to clipboard.");

        assert_eq!(
            recorder.events(),
            vec![NotificationEvent {
                headline: "Contest 1500 Problem C1".into(),
                body: "Copied & Opened Browser".into(),
            }]
        );
        assert!(recorder.has_message(Level::Info, "copied"));
    }

    #[test]
    fn test_toasts_hidden_but_messages_kept() {
        let recorder = Arc::new(Recorder::default());
        let reporter = Reporter::new(recorder.clone(), recorder.clone(), false);
        reporter.notify("Failed to open browser");
        reporter.error("Failed to open browser.");

        assert!(recorder.events().is_empty());
        assert_eq!(
            recorder.messages(),
            vec![(Level::Error, "Failed to open browser.".to_owned())]
        );
    }

    #[test]
    fn test_console_sinks() -> anyhow::Result<()> {
        console::set_colors_enabled(false);
        let cnsl = Mutex::new(Console::buf(ConsoleConfig::default()));
        cnsl.log(Level::Warn, "Check the browser");
        cnsl.toast(&NotificationEvent {
            headline: "Contest 4 Problem A".into(),
            body: "Submitted".into(),
        });
        let output = cnsl.into_inner().unwrap().take_output()?;
        assert_eq!(
            output,
            "WARN: Check the browser\n>> Contest 4 Problem A Submitted\n"
        );
        Ok(())
    }
}
