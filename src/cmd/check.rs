use std::fmt;

use cfsubmit_codeforces::AutomationStrategy;
use serde::Serialize;
use structopt::StructOpt;
use strum::VariantNames;

use crate::abs_path::AbsPathBuf;
use crate::cmd::{Outcome, Run};
use crate::config::StrategyKind;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct CheckOpt {
    /// Overrides the automation strategy in config
    #[structopt(long, possible_values = &StrategyKind::VARIANTS)]
    strategy: Option<StrategyKind>,
}

impl Run for CheckOpt {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        let mut conf = conf.clone();
        if let Some(strategy) = self.strategy {
            conf.override_strategy(strategy);
        }
        let strategy = AutomationStrategy::from_config(conf.automation());
        if strategy.script().is_none() {
            cnsl.warn("No automation tool found. Code will have to be pasted and submitted manually.")?;
        }
        Ok(Box::new(CheckOutcome {
            config_path: conf.path().clone(),
            requested: conf.automation().strategy(),
            strategy,
            show_toast_messages: conf.show_toast_messages(),
        }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckOutcome {
    config_path: Option<AbsPathBuf>,
    requested: StrategyKind,
    strategy: AutomationStrategy,
    show_toast_messages: bool,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.config_path {
            Some(path) => writeln!(f, "Config     : {}", path)?,
            None => writeln!(f, "Config     : (default)")?,
        }
        writeln!(f, "Requested  : {}", self.requested)?;
        writeln!(f, "Automation : {}", self.strategy)?;
        write!(
            f,
            "Toasts     : {}",
            if self.show_toast_messages { "on" } else { "off" }
        )
    }
}

impl Outcome for CheckOutcome {
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_default() -> anyhow::Result<()> {
        let outcome = CheckOpt { strategy: None }.run_default()?;
        assert!(!outcome.is_error());
        assert!(outcome.to_string().contains("Requested  : auto"));
        Ok(())
    }

    #[test]
    fn run_with_strategy_none() -> anyhow::Result<()> {
        let opt = CheckOpt {
            strategy: Some(StrategyKind::None),
        };
        let outcome = opt.run_default()?;
        assert!(outcome.to_string().contains("Automation : none"));
        Ok(())
    }
}
