use std::{fmt, io};

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;

use crate::{Config, Console, OutputFormat, Result};

mod check;
mod init;
mod parse;
mod show;
mod submit;

pub use check::{CheckOpt, CheckOutcome};
pub use init::{InitOpt, InitOutcome};
pub use parse::{ParseOpt, ParseOutcome};
pub use show::ShowOpt;
pub use submit::SubmitOpt;

pub trait Outcome: OutcomeSerialize {
    fn is_error(&self) -> bool;
}

pub trait OutcomeSerialize: fmt::Display + fmt::Debug {
    fn write_json(&self, writer: &mut dyn io::Write) -> Result<()>;

    fn write_yaml(&self, writer: &mut dyn io::Write) -> Result<()>;

    fn print(&self, stdout: &mut dyn io::Write, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Default => writeln!(stdout, "{}", self)?,
            OutputFormat::Debug => writeln!(stdout, "{:?}", self)?,
            OutputFormat::Json => {
                self.write_json(stdout)?;
                writeln!(stdout)?;
            }
            OutputFormat::Yaml => self.write_yaml(stdout)?,
        }
        Ok(())
    }
}

impl<T: Serialize + fmt::Display + fmt::Debug> OutcomeSerialize for T {
    fn write_json(&self, writer: &mut dyn io::Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Could not print outcome as json")
    }

    fn write_yaml(&self, writer: &mut dyn io::Write) -> Result<()> {
        serde_yaml::to_writer(writer, self).context("Could not print outcome as yaml")
    }
}

pub trait Run {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>>;

    #[cfg(test)]
    fn run_default(&self) -> Result<Box<dyn Outcome>> {
        let conf = Config::default();
        let cnsl = &mut Console::buf(Default::default());
        self.run(&conf, cnsl)
    }
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub enum Cmd {
    /// Creates config file
    Init(InitOpt),
    /// Shows current config
    Show(ShowOpt),
    /// Shows which automation strategy would be used on this host
    Check(CheckOpt),
    /// Extracts contest and problem from a problem url
    Parse(ParseOpt),
    /// Copies source to clipboard and submits it through the browser
    Submit(SubmitOpt),
}

impl Run for Cmd {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        match self {
            Self::Init(opt) => Ok(Box::new(opt.run(cnsl)?)),
            Self::Show(opt) => opt.run(conf, cnsl),
            Self::Check(opt) => opt.run(conf, cnsl),
            Self::Parse(opt) => opt.run(conf, cnsl),
            Self::Submit(opt) => opt.run(conf, cnsl),
        }
    }
}
