use anyhow::Context as _;

use crate::{Error, Result};

/// Holds the code between the editor and the submit page.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Opens urls in the default browser.
pub trait Browser {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// The system clipboard.
///
/// The handle is created on first use and kept afterwards:
/// on X11 the copied text is only served while the handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().context("Could not access clipboard")?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| Error::msg("Could not access clipboard"))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner()?
            .set_text(text.to_owned())
            .context("Could not write to clipboard")
    }
}

/// The default browser of the desktop environment.
#[derive(Default, Debug, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        if cfg!(test) {
            unreachable!("Cannot open url in browser during test");
        }
        match webbrowser::open(url) {
            Err(err) => Err(err.into()),
            Ok(output) if !output.status.success() => {
                Err(Error::msg("Browser process returned non-zero exit code"))
            }
            Ok(_) => Ok(()),
        }
        .with_context(|| format!("Could not open url in browser : {}", url))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory clipboard and browser that share one event log,
    /// so that tests can check the order of side effects.
    #[derive(Default, Clone)]
    pub struct Desk {
        pub effects: Arc<Mutex<Vec<Effect>>>,
        pub fail_clipboard: bool,
        pub fail_browser: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect {
        Copied(String),
        Opened(String),
    }

    impl Desk {
        pub fn effects(&self) -> Vec<Effect> {
            self.effects.lock().unwrap().clone()
        }
    }

    impl Clipboard for Desk {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail_clipboard {
                return Err(Error::msg("no display"));
            }
            self.effects
                .lock()
                .unwrap()
                .push(Effect::Copied(text.to_owned()));
            Ok(())
        }
    }

    impl Browser for Desk {
        fn open(&mut self, url: &str) -> Result<()> {
            if self.fail_browser {
                return Err(Error::msg("no browser"));
            }
            self.effects
                .lock()
                .unwrap()
                .push(Effect::Opened(url.to_owned()));
            Ok(())
        }
    }
}
