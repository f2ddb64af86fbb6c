use std::fmt;

use cfsubmit_codeforces::{problem_url, submit_url};
use cfsubmit_util::model::ParsedProblem;
use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::{Outcome, Run};
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct ParseOpt {
    /// Url of a problem page
    #[structopt(name = "url")]
    problem_url: String,
}

impl Run for ParseOpt {
    fn run(&self, _conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        let problem = problem_url::parse(&self.problem_url);
        if problem.is_none() {
            cnsl.warn(&format!(
                "Could not recognize problem url : {}",
                self.problem_url
            ))?;
        }
        Ok(Box::new(ParseOutcome {
            problem_url: self.problem_url.clone(),
            problem,
            submit_url: submit_url::rewrite(&self.problem_url),
        }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseOutcome {
    problem_url: String,
    problem: Option<ParsedProblem>,
    submit_url: String,
}

impl fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.problem {
            Some(problem) => writeln!(f, "{}", problem.headline())?,
            None => writeln!(f, "Unrecognized problem url")?,
        }
        write!(f, "Submit page : {}", self.submit_url)
    }
}

impl Outcome for ParseOutcome {
    fn is_error(&self) -> bool {
        self.problem.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(url: &str) -> anyhow::Result<Box<dyn Outcome>> {
        ParseOpt {
            problem_url: url.to_owned(),
        }
        .run_default()
    }

    #[test]
    fn run_gym() -> anyhow::Result<()> {
        let outcome = run("https://codeforces.com/gym/102942/problem/F")?;
        assert!(!outcome.is_error());
        assert_eq!(
            outcome.to_string(),
            "Contest 102942 Problem F\nSubmit page : https://codeforces.com/gym/102942/submit/F"
        );
        Ok(())
    }

    #[test]
    fn run_problemset() -> anyhow::Result<()> {
        let outcome = run("https://codeforces.com/problemset/problem/1520/G")?;
        assert!(!outcome.is_error());
        assert!(outcome
            .to_string()
            .ends_with("https://codeforces.com/contest/1520/submit/G"));
        Ok(())
    }

    #[test]
    fn run_unrecognized() -> anyhow::Result<()> {
        let outcome = run("https://atcoder.jp/contests/abc100/tasks/abc100_a")?;
        assert!(outcome.is_error());
        Ok(())
    }
}
