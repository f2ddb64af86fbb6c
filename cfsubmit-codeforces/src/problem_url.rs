//! Extracts contest and problem identifiers from a Codeforces problem url.
//!
//! Recognized shapes, tried in this order:
//!
//! 1. `https://codeforces.com/{contest|gym}/{contest_id}/problem/{problem_code}`
//! 2. `https://codeforces.com/problemset/problem/{contest_id}/{problem_code}`
//! 3. `https://codeforces.com/group/{group_id}/contest/{contest_id}/problem/{problem_code}`

use cfsubmit_util::regex;
use regex::Regex;

use crate::model::ParsedProblem;

/// Parses `url` into identifiers, or returns `None` if no known shape matches.
pub fn parse(url: &str) -> Option<ParsedProblem> {
    let patterns: [&Regex; 3] = [
        regex!(
            r"^[A-Za-z][A-Za-z0-9+.-]*://codeforces\.com/(?:gym|contest)/([1-9][0-9]*)/problem/([A-Za-z0-9]+)(?:[/?#]|$)"
        ),
        regex!(
            r"^[A-Za-z][A-Za-z0-9+.-]*://codeforces\.com/problemset/problem/([1-9][0-9]*)/([A-Za-z0-9]+)(?:[/?#]|$)"
        ),
        regex!(
            r"^[A-Za-z][A-Za-z0-9+.-]*://codeforces\.com/group/[A-Za-z0-9]+/contest/([1-9][0-9]*)/problem/([A-Za-z0-9]+)(?:[/?#]|$)"
        ),
    ];
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .map(|caps| ParsedProblem::new(&caps[1], &caps[2]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let tests = &[
            ("https://codeforces.com/contest/1500/problem/C1", "1500", "C1"),
            ("https://codeforces.com/contest/1234/problem/C", "1234", "C"),
            ("http://codeforces.com/contest/1234/problem/C", "1234", "C"),
            ("https://codeforces.com/gym/102007/problem/A", "102007", "A"),
            ("https://codeforces.com/contest/1500/problem/c1?locale=en", "1500", "c1"),
            ("https://codeforces.com/contest/1500/problem/0#statement", "1500", "0"),
            ("https://codeforces.com/problemset/problem/4/A", "4", "A"),
            ("https://codeforces.com/problemset/problem/1760/F/", "1760", "F"),
            (
                "https://codeforces.com/group/MWSDmqGsZm/contest/219158/problem/B",
                "219158",
                "B",
            ),
        ];
        for (url, contest_id, problem_code) in tests {
            let actual = parse(url);
            assert_eq!(
                actual,
                Some(ParsedProblem::new(*contest_id, *problem_code)),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_parse_not_found() {
        let tests = &[
            "",
            "codeforces.com/contest/1500/problem/C1",
            "https://atcoder.jp/contests/abc100/tasks/abc100_a",
            "https://codeforces.com/contest/1500",
            "https://codeforces.com/contest/1500/submit/C1",
            "https://codeforces.com/contest/0123/problem/A",
            "https://codeforces.com/contest/1500/problem/C-1",
            "https://www.codeforces.com/contest/1500/problem/C1",
            "https://codeforces.com/problemset/problem/4",
        ];
        for url in tests {
            assert_eq!(parse(url), None, "{}", url);
        }
    }

    #[test]
    fn test_first_match_wins_for_group() {
        // the group shape also contains `/contest/`, but its prefix keeps the first pattern off
        let actual = parse("https://codeforces.com/group/abc/contest/5/problem/D2");
        assert_eq!(actual, Some(ParsedProblem::new("5", "D2")));
    }
}
