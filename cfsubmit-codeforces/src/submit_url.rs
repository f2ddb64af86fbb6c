//! Maps a Codeforces problem url to the url of its submit page.

use cfsubmit_util::regex;

static PROBLEM_SEGMENT: &str = "/problem/";

/// Returns the submit page url for `url`, or `url` unchanged if no rule applies.
///
/// Contest, gym and group urls keep their prefix up to `/problem/`.
/// Problemset urls have no submit page of their own and are routed through the contest.
pub fn rewrite(url: &str) -> String {
    rewrite_contest_like(url)
        .or_else(|| rewrite_problemset(url))
        .unwrap_or_else(|| url.to_owned())
}

fn rewrite_contest_like(url: &str) -> Option<String> {
    let pos = url.find(PROBLEM_SEGMENT)?;
    let prefix = &url[..pos];
    if !["/contest/", "/gym/", "/group/"]
        .iter()
        .any(|segment| prefix.contains(segment))
    {
        return None;
    }
    let index = problem_index(&url[pos + PROBLEM_SEGMENT.len()..])?;
    Some(format!("{}/submit/{}", prefix, index))
}

fn rewrite_problemset(url: &str) -> Option<String> {
    let caps = regex!(r"/problemset/problem/([0-9]+)/([^/?#]+)").captures(url)?;
    Some(format!(
        "https://codeforces.com/contest/{}/submit/{}",
        &caps[1], &caps[2]
    ))
}

/// Cuts the problem index out of the rest of the path, dropping any query or fragment.
fn problem_index(rest: &str) -> Option<&str> {
    let end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    match &rest[..end] {
        "" => None,
        index => Some(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite() {
        let tests = &[
            (
                "https://codeforces.com/contest/1500/problem/C1",
                "https://codeforces.com/contest/1500/submit/C1",
            ),
            (
                "http://codeforces.com/contest/1234/problem/C",
                "http://codeforces.com/contest/1234/submit/C",
            ),
            (
                "https://codeforces.com/contest/1234/problem/C?locale=ru",
                "https://codeforces.com/contest/1234/submit/C",
            ),
            (
                "https://codeforces.com/contest/1234/problem/C#section",
                "https://codeforces.com/contest/1234/submit/C",
            ),
            (
                "https://codeforces.com/gym/102007/problem/A",
                "https://codeforces.com/gym/102007/submit/A",
            ),
            (
                "https://codeforces.com/group/MWSDmqGsZm/contest/219158/problem/B/",
                "https://codeforces.com/group/MWSDmqGsZm/contest/219158/submit/B",
            ),
            (
                "https://codeforces.com/problemset/problem/4/A",
                "https://codeforces.com/contest/4/submit/A",
            ),
            (
                "http://codeforces.com/problemset/problem/1760/F?locale=en",
                "https://codeforces.com/contest/1760/submit/F",
            ),
        ];
        for (url, expected) in tests {
            assert_eq!(&rewrite(url), expected, "{}", url);
        }
    }

    #[test]
    fn test_rewrite_unchanged() {
        let tests = &[
            "",
            "https://atcoder.jp/contests/abc100/tasks/abc100_a",
            "https://codeforces.com/contest/1500",
            "https://codeforces.com/contest/1500/problem/",
            "https://codeforces.com/contest/1500/problem/?locale=en",
            "https://codeforces.com/problemset/problem/4",
            "https://codeforces.com/blog/problem/42",
        ];
        for url in tests {
            assert_eq!(&rewrite(url), url);
        }
    }

    #[test]
    fn test_rewrite_twice_is_same_as_once() {
        let tests = &[
            "https://codeforces.com/contest/1500/problem/C1",
            "https://codeforces.com/gym/102007/problem/A?locale=en",
            "https://codeforces.com/group/abc/contest/5/problem/D2",
            "https://codeforces.com/problemset/problem/4/A",
            "https://example.com/",
        ];
        for url in tests {
            let once = rewrite(url);
            assert_eq!(rewrite(&once), once, "{}", url);
        }
    }
}
