use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use getset::Getters;
use serde::{Deserialize, Serialize};

/// Contest and problem identifiers extracted from a problem url.
///
/// Used only to label messages; navigation always works from the url itself.
#[derive(Serialize, Deserialize, Getters, Default, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct ParsedProblem {
    contest_id: ContestId,
    problem_code: ProblemCode,
}

impl ParsedProblem {
    pub fn new(contest_id: impl Into<ContestId>, problem_code: impl Into<ProblemCode>) -> Self {
        Self {
            contest_id: contest_id.into(),
            problem_code: problem_code.into(),
        }
    }

    /// Headline shared by every notification about this problem.
    ///
    /// Identifiers are left empty for a problem that could not be parsed.
    pub fn headline(&self) -> String {
        format!("Contest {} Problem {}", self.contest_id, self.problem_code)
    }
}

impl fmt::Display for ParsedProblem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.contest_id, self.problem_code)
    }
}

/// Numeric id of a contest or gym (e.g. `1500`), kept as text.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContestId(String);

impl<T: Into<String>> From<T> for ContestId {
    fn from(id: T) -> Self {
        Self(id.into())
    }
}

impl FromStr for ContestId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for ContestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Problem index inside a contest (e.g. `A`, `C1`).
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProblemCode(String);

impl<T: Into<String>> From<T> for ProblemCode {
    fn from(code: T) -> Self {
        Self(code.into())
    }
}

impl FromStr for ProblemCode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for ProblemCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline() {
        let problem = ParsedProblem::new("1500", "C1");
        assert_eq!(problem.headline(), "Contest 1500 Problem C1");
        assert_eq!(problem.to_string(), "1500C1");
    }

    #[test]
    fn test_headline_of_unparsed() {
        assert_eq!(ParsedProblem::default().headline(), "Contest  Problem ");
    }

    #[test]
    fn test_serialize() -> anyhow::Result<()> {
        let problem = ParsedProblem::new("4", "A");
        let actual = serde_yaml::to_string(&problem)?;
        let restored: ParsedProblem = serde_yaml::from_str(&actual)?;
        assert_eq!(restored, problem);
        Ok(())
    }
}
