#![warn(clippy::all)]

#[macro_use]
extern crate strum;

use std::io::{self, Write as _};

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;
use strum::VariantNames;

mod cmd;

use cfsubmit_config as config;
use cfsubmit_util::abs_path;

use cmd::{Cmd, Outcome, Run as _};
use config::Config;

pub use cfsubmit_util::console::{Console, ConsoleConfig};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

#[derive(
    Serialize,
    EnumString,
    EnumVariantNames,
    IntoStaticStr,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    Default,
    Debug,
    Json,
    Yaml,
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(about, rename_all = "kebab")]
pub struct Opt {
    #[structopt(flatten)]
    global_opt: GlobalOpt,
    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct GlobalOpt {
    /// Format of the outcome printed to stdout
    #[structopt(
        long,
        global = true,
        default_value = OutputFormat::Default.into(),
        possible_values = &OutputFormat::VARIANTS,
    )]
    pub output_format: OutputFormat,
    /// Assumes "yes" as answer to all prompts and runs non-interactively
    #[structopt(long, short = "y", global = true)]
    pub assume_yes: bool,
    /// Hides progress messages
    #[structopt(long, short = "q", global = true)]
    pub quiet: bool,
}

impl Opt {
    pub fn global_opt(&self) -> &GlobalOpt {
        &self.global_opt
    }

    pub fn run(&self, cnsl: &mut Console) -> Result<()> {
        let outcome = self.run_cmd(cnsl)?;
        let stdout = &mut io::stdout();
        outcome.print(stdout, self.global_opt.output_format)?;
        stdout.flush()?;
        if outcome.is_error() {
            return Err(Error::msg("Command finished with an error"));
        }
        Ok(())
    }

    fn run_cmd(&self, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        // init must work without any config file
        if let Cmd::Init(opt) = &self.cmd {
            return Ok(Box::new(opt.run(cnsl)?));
        }
        let conf = Config::load(None, cnsl).context("Could not load config")?;
        self.cmd.run(&conf, cnsl)
    }
}

#[cfg(test)]
mod tests {
    use cfsubmit_util::assert_matches;

    use super::*;

    #[test]
    fn parse_global_opt() -> anyhow::Result<()> {
        let opt = Opt::from_iter_safe(&[
            "cfsubmit",
            "parse",
            "https://codeforces.com/contest/1500/problem/C1",
            "--output-format",
            "json",
            "-y",
        ])?;
        assert_eq!(opt.global_opt().output_format, OutputFormat::Json);
        assert!(opt.global_opt().assume_yes);
        assert!(!opt.global_opt().quiet);
        assert_matches!(opt.cmd => Cmd::Parse(_));
        Ok(())
    }

    #[test]
    fn reject_unknown_output_format() {
        let res = Opt::from_iter_safe(&["cfsubmit", "--output-format", "toml", "show"]);
        assert!(res.is_err());
    }
}
