//! Config for cfsubmit.
//!
//! Config is read from `cfsubmit.yaml`.
//! The file is searched in the current directory and all of its ancestors,
//! then in the user config directory (e.g. `~/.config/cfsubmit/cfsubmit.yaml`).
//! Built-in defaults are used when no file is found.
//!
//! ## Fields
//!
//! - `version` : version of cfsubmit that generated the file.
//!   The file is rejected if it is not compatible with the running binary.
//! - `show_toast_messages` : whether notifications are shown as toasts.
//!   Console messages are always printed.
//! - `automation.strategy` : one of `auto`, `native`, `script` and `none`.
//! - `automation.startup_delay` : wait before input is injected,
//!   in [humantime](https://docs.rs/humantime) format (e.g. `2500ms`, `3s`).
//! - `automation.command` : custom automation program followed by its arguments.

#![warn(clippy::all)]

#[macro_use]
extern crate strum;

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context as _};
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use cfsubmit_util::{abs_path, console};

use crate::abs_path::AbsPathBuf;
use crate::console::Console;

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

lazy_static! {
    static ref VERSION: Version = Version::parse(env!("CARGO_PKG_VERSION")).unwrap();
}

#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    /// Path of the loaded file, or `None` when running on defaults.
    #[get = "pub"]
    path: Option<AbsPathBuf>,
    body: ConfigBody,
}

impl Config {
    /// Loads config from `base_dir`, or searches for it when `base_dir` is `None`.
    pub fn load(base_dir: Option<AbsPathBuf>, cnsl: &mut Console) -> Result<Self> {
        let path = match base_dir {
            Some(base_dir) => Some(base_dir.join(ConfigBody::FILE_NAME)),
            None => ConfigBody::search(&AbsPathBuf::cwd()?, cnsl),
        };
        Self::load_from(path, cnsl)
    }

    fn load_from(path: Option<AbsPathBuf>, cnsl: &mut Console) -> Result<Self> {
        let body = match &path {
            Some(path) => ConfigBody::load(path, cnsl)?,
            None => {
                writeln!(cnsl, "Could not find config file. Using default config.")?;
                ConfigBody::default()
            }
        };
        Ok(Self { path, body })
    }

    pub fn show_toast_messages(&self) -> bool {
        self.body.show_toast_messages
    }

    pub fn automation(&self) -> &AutomationConfig {
        &self.body.automation
    }

    /// Replaces the configured strategy, e.g. with one given on the command line.
    pub fn override_strategy(&mut self, strategy: StrategyKind) {
        self.body.automation.strategy = strategy;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            body: ConfigBody::default(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let yaml_str = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", yaml_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigBody {
    #[serde(with = "string_serde")]
    version: Version,
    #[serde(default = "ConfigBody::default_show_toast_messages")]
    show_toast_messages: bool,
    #[serde(default)]
    automation: AutomationConfig,
}

impl ConfigBody {
    pub const FILE_NAME: &'static str = "cfsubmit.yaml";

    const APP_DIR_NAME: &'static str = "cfsubmit";

    pub fn generate_to(writer: &mut dyn Write) -> Result<()> {
        write!(
            writer,
            include_str!("../resources/cfsubmit.yaml.txt"),
            version = &*VERSION,
        )
        .context("Could not write config")
    }

    fn default_show_toast_messages() -> bool {
        true
    }

    fn search(start: &AbsPathBuf, cnsl: &mut Console) -> Option<AbsPathBuf> {
        if let Some(base_dir) = start.search_dir_contains(Self::FILE_NAME) {
            writeln!(cnsl, "Found config file in base_dir: {}", base_dir).unwrap_or(());
            return Some(base_dir.join(Self::FILE_NAME));
        }
        let global_path = dirs::config_dir()
            .and_then(|dir| AbsPathBuf::try_new(dir).ok())
            .map(|dir| dir.join(Self::APP_DIR_NAME).join(Self::FILE_NAME))?;
        if global_path.as_ref().is_file() {
            Some(global_path)
        } else {
            None
        }
    }

    fn load(path: &AbsPathBuf, cnsl: &mut Console) -> Result<Self> {
        let body: Self = path.load_pretty(
            |file| serde_yaml::from_reader(file).context("Could not read config file as yaml"),
            None,
            cnsl,
        )?;
        body.validate()?;
        Ok(body)
    }

    fn validate(&self) -> Result<()> {
        let version_req = VersionReq::parse(&self.version.to_string())
            .context("Could not parse version requirement")?;
        if !version_req.matches(&VERSION) {
            return Err(anyhow!(
                r#"Found mismatched version in config file.
    config version   : {}
    cfsubmit version : {}
Fix the config file so that it is compatible with the current version of cfsubmit."#,
                self.version,
                &*VERSION
            ));
        }

        let automation = &self.automation;
        if automation.strategy == StrategyKind::None && !automation.command.is_empty() {
            return Err(anyhow!(
                "Found automation command with strategy `none`. Remove one of them."
            ));
        }

        Ok(())
    }
}

impl Default for ConfigBody {
    fn default() -> Self {
        Self {
            version: VERSION.clone(),
            show_toast_messages: Self::default_show_toast_messages(),
            automation: AutomationConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Getters, CopyGetters, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct AutomationConfig {
    #[get_copy = "pub"]
    strategy: StrategyKind,
    #[serde(with = "humantime_serde")]
    #[get_copy = "pub"]
    startup_delay: Duration,
    #[get = "pub"]
    command: Vec<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            startup_delay: Duration::from_millis(2500),
            command: Vec::new(),
        }
    }
}

/// Which kind of automation to use once the submit page is opened.
#[derive(
    Serialize,
    Deserialize,
    EnumString,
    EnumVariantNames,
    IntoStaticStr,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyKind {
    Auto,
    Native,
    Script,
    None,
}

impl Default for StrategyKind {
    fn default() -> Self {
        Self::Auto
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}

mod string_serde {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::console::ConsoleConfig;

    #[test]
    fn generate_and_deserialize() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        ConfigBody::generate_to(&mut buf)?;
        let body_yaml_str = String::from_utf8(buf)?;
        let body_generated: ConfigBody = serde_yaml::from_str(&body_yaml_str)?;

        assert_eq!(body_generated, ConfigBody::default());
        Ok(())
    }

    #[test]
    fn load_from_base_dir() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        fs::write(
            test_dir.path().join(ConfigBody::FILE_NAME),
            format!(
                "version: {}\nshow_toast_messages: false\nautomation:\n  strategy: script\n  startup_delay: 3s\n",
                &*VERSION
            ),
        )?;

        let cnsl = &mut Console::buf(ConsoleConfig::default());
        let base_dir = AbsPathBuf::try_new(test_dir.path())?;
        let conf = Config::load(Some(base_dir.clone()), cnsl)?;

        assert!(!conf.show_toast_messages());
        assert_eq!(conf.automation().strategy(), StrategyKind::Script);
        assert_eq!(conf.automation().startup_delay(), Duration::from_secs(3));
        assert!(conf.automation().command().is_empty());
        assert_eq!(conf.path(), &Some(base_dir.join(ConfigBody::FILE_NAME)));
        Ok(())
    }

    #[test]
    fn load_missing_file_in_base_dir() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let cnsl = &mut Console::buf(ConsoleConfig::default());
        let result = Config::load(Some(AbsPathBuf::try_new(test_dir.path())?), cnsl);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn search_in_ancestors() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let base_dir = AbsPathBuf::try_new(test_dir.path())?;
        let nested = base_dir.join("contest/1500");
        nested.create_dir_all()?;
        fs::write(base_dir.join(ConfigBody::FILE_NAME), format!("version: {}\n", &*VERSION))?;

        let cnsl = &mut Console::buf(ConsoleConfig::default());
        let found = ConfigBody::search(&nested, cnsl);
        assert_eq!(found, Some(base_dir.join(ConfigBody::FILE_NAME)));

        let conf = Config::load_from(found, cnsl)?;
        assert!(conf.show_toast_messages());
        assert_eq!(conf.automation(), &AutomationConfig::default());
        Ok(())
    }

    #[test]
    fn reject_mismatched_version() -> anyhow::Result<()> {
        let body: ConfigBody = serde_yaml::from_str("version: 99.0.0\n")?;
        assert!(body.validate().is_err());
        Ok(())
    }

    #[test]
    fn reject_command_with_strategy_none() -> anyhow::Result<()> {
        let body: ConfigBody = serde_yaml::from_str(&format!(
            "version: {}\nautomation:\n  strategy: none\n  command: [\"xdotool\"]\n",
            &*VERSION
        ))?;
        assert!(body.validate().is_err());
        Ok(())
    }

    #[test]
    fn strategy_kind_from_str() -> anyhow::Result<()> {
        assert_eq!("native".parse::<StrategyKind>()?, StrategyKind::Native);
        assert_eq!(StrategyKind::None.to_string(), "none");
        assert!("keyboard".parse::<StrategyKind>().is_err());
        Ok(())
    }
}
