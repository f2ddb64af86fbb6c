//! Finishes a submission in the browser by injecting keystrokes.
//!
//! Every strategy runs one short-lived external process that waits for the
//! submit page to load, then selects all, pastes the clipboard, moves focus
//! forward twice and presses enter. The process never receives the code itself.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use getset::Getters;
use serde::Serialize;
use tokio::process::Command;

use crate::config::{AutomationConfig, StrategyKind};

mod session;

pub use session::{AutomationOutcome, AutomationSession};

/// External program invoked to inject input, with all of its arguments.
#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct AutomationScript {
    program: PathBuf,
    args: Vec<String>,
}

impl AutomationScript {
    pub fn new<S: Into<String>>(
        program: impl Into<PathBuf>,
        args: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the command with no stdin; its output is discarded and only the exit status is used.
    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }

    /// AppleScript through `osascript`, driving "System Events".
    fn apple_script(osascript: PathBuf, delay: Duration) -> Self {
        let lines = vec![
            format!("delay {}", secs(delay)),
            r#"tell application "System Events""#.to_owned(),
            r#"keystroke "a" using command down"#.to_owned(),
            r#"keystroke "v" using command down"#.to_owned(),
            "key code 48".to_owned(),
            "key code 48".to_owned(),
            "key code 36".to_owned(),
            "end tell".to_owned(),
        ];
        let args = lines.into_iter().flat_map(|line| vec!["-e".to_owned(), line]);
        Self::new(osascript, args)
    }

    /// Keystrokes through `xdotool` on X11 desktops.
    fn xdotool(xdotool: PathBuf, delay: Duration) -> Self {
        Self::new(
            xdotool,
            vec![
                "sleep".to_owned(),
                secs(delay),
                "key".to_owned(),
                "--clearmodifiers".to_owned(),
                "ctrl+a".to_owned(),
                "ctrl+v".to_owned(),
                "Tab".to_owned(),
                "Tab".to_owned(),
                "Return".to_owned(),
            ],
        )
    }

    /// `SendKeys` of Windows Forms through PowerShell.
    fn send_keys(powershell: PathBuf, delay: Duration) -> Self {
        let send = |keys: &str| format!("[System.Windows.Forms.SendKeys]::SendWait('{}')", keys);
        let script = [
            "Add-Type -AssemblyName System.Windows.Forms".to_owned(),
            format!("Start-Sleep -Milliseconds {}", delay.as_millis()),
            send("^a"),
            send("^v"),
            send("{TAB}{TAB}"),
            send("{ENTER}"),
        ]
        .join("; ");
        Self::new(
            powershell,
            vec!["-NoProfile", "-NonInteractive", "-Command", script.as_str()],
        )
    }
}

impl fmt::Display for AutomationScript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program.display())
    }
}

/// How the submission is finished once the submit page is open.
///
/// Selected once, when the submitter is built.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "script")]
pub enum AutomationStrategy {
    /// Native input simulation api of the OS.
    Native(AutomationScript),
    /// Scripted UI automation or a keystroke injection tool.
    Script(AutomationScript),
    /// Nothing available; the user pastes and submits by hand.
    None,
}

impl AutomationStrategy {
    /// `none` wins over a configured command, also when it comes from the command line.
    pub fn from_config(conf: &AutomationConfig) -> Self {
        if conf.strategy() == StrategyKind::None {
            return Self::None;
        }
        if !conf.command().is_empty() {
            let (program, args) = conf.command().split_at(1);
            let script = AutomationScript::new(&program[0], args.iter().cloned());
            return match conf.strategy() {
                StrategyKind::Native => Self::Native(script),
                _ => Self::Script(script),
            };
        }
        let delay = conf.startup_delay();
        match conf.strategy() {
            StrategyKind::Auto => Self::detect(delay),
            StrategyKind::Native => Self::native(delay).unwrap_or(Self::None),
            StrategyKind::Script => Self::scripted(delay).unwrap_or(Self::None),
            StrategyKind::None => Self::None,
        }
    }

    /// Picks the first strategy whose tool is installed on this host.
    pub fn detect(delay: Duration) -> Self {
        Self::native(delay)
            .or_else(|| Self::scripted(delay))
            .unwrap_or(Self::None)
    }

    fn native(delay: Duration) -> Option<Self> {
        if !cfg!(windows) {
            return None;
        }
        find_program("powershell").map(|path| Self::Native(AutomationScript::send_keys(path, delay)))
    }

    fn scripted(delay: Duration) -> Option<Self> {
        if cfg!(target_os = "macos") {
            find_program("osascript")
                .map(|path| Self::Script(AutomationScript::apple_script(path, delay)))
        } else if cfg!(unix) {
            find_program("xdotool").map(|path| Self::Script(AutomationScript::xdotool(path, delay)))
        } else {
            None
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Native(_) => StrategyKind::Native,
            Self::Script(_) => StrategyKind::Script,
            Self::None => StrategyKind::None,
        }
    }

    pub fn script(&self) -> Option<&AutomationScript> {
        match self {
            Self::Native(script) | Self::Script(script) => Some(script),
            Self::None => None,
        }
    }
}

impl fmt::Display for AutomationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.script() {
            Some(script) => write!(f, "{} ({})", self.kind(), script),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Searches `PATH` for an executable named `name`.
fn find_program(name: &str) -> Option<PathBuf> {
    let env_path = env::var_os("PATH")?;
    env::split_paths(&env_path)
        .map(|dir| {
            if cfg!(windows) {
                dir.join(name).with_extension("exe")
            } else {
                dir.join(name)
            }
        })
        .find(|path| path.is_file())
}

fn secs(delay: Duration) -> String {
    format!("{:.3}", delay.as_secs_f64())
}
