use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cfsubmit_codeforces::{IssueKind, SubmitReport, SubmitRequest, SubmitState, Submitter};
use structopt::StructOpt;
use strum::VariantNames;

use crate::abs_path::AbsPathBuf;
use crate::cmd::{Outcome, Run};
use crate::config::StrategyKind;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct SubmitOpt {
    /// Source file to submit
    #[structopt(name = "source")]
    source_path: PathBuf,
    /// Url of the problem page, e.g. https://codeforces.com/contest/1500/problem/C1
    #[structopt(name = "url")]
    problem_url: String,
    /// Overrides the automation strategy in config
    #[structopt(long, possible_values = &StrategyKind::VARIANTS)]
    strategy: Option<StrategyKind>,
}

impl Run for SubmitOpt {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        let mut conf = conf.clone();
        if let Some(strategy) = self.strategy {
            conf.override_strategy(strategy);
        }
        let source_path = AbsPathBuf::cwd()?.join_expand(&self.source_path)?;
        let request = SubmitRequest::new(source_path, self.problem_url.as_str());

        let log = Arc::new(Mutex::new(cnsl.fork()));
        let mut submitter = Submitter::new(&conf, log.clone(), log);
        let report = Self::submit(&mut submitter, &request);

        if report.state() == &SubmitState::Done && report.has_issue(IssueKind::AutomationToolMissing)
        {
            // the clipboard is owned by this process on some platforms
            cnsl.confirm("Press enter once the code is submitted.", true)?;
        }

        Ok(Box::new(report))
    }
}

impl SubmitOpt {
    #[tokio::main]
    async fn submit(submitter: &mut Submitter, request: &SubmitRequest) -> SubmitReport {
        let mut report = submitter.submit(request).await;
        if let Some(outcome) = submitter.wait_automation().await {
            report.complete(outcome);
        }
        report
    }
}

impl Outcome for SubmitReport {
    fn is_error(&self) -> bool {
        self.is_failed()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn run_with_empty_source() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let source_path = test_dir.path().join("main.cpp");
        fs::write(&source_path, "\n")?;
        let opt = SubmitOpt {
            source_path,
            problem_url: "https://codeforces.com/contest/1500/problem/C1".into(),
            strategy: Some(StrategyKind::None),
        };

        let outcome = opt.run_default()?;
        assert!(outcome.is_error());
        assert!(outcome.to_string().contains("Contest 1500 Problem C1"));
        assert!(outcome.to_string().ends_with("State       : failed"));
        Ok(())
    }

    #[test]
    fn run_with_missing_source() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let opt = SubmitOpt {
            source_path: test_dir.path().join("missing.py"),
            problem_url: "https://codeforces.com/problemset/problem/4/A".into(),
            strategy: None,
        };

        let outcome = opt.run_default()?;
        assert!(outcome.is_error());
        Ok(())
    }
}
