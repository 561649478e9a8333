//! # Scan Target Model
//!
//! A [`Target`] is one normalized URL built from one line of the input list.
//!
//! Normalization only guarantees a scheme:
//! * `http://` and `https://` prefixes (any case) are kept as they are.
//! * Anything else gets `http://` prepended.
//!
//! No further validation happens here. A malformed entry still becomes a
//! `Target` and fails later, when it is probed.

use std::fmt;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";
const COMMENT_PREFIX: char = '#';

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    url: String,
}

impl Target {
    /// Builds a target from a raw host, IP or URL.
    pub fn normalize(raw: &str) -> Self {
        let raw: &str = raw.trim();
        let url: String = match scheme_len(raw) {
            Some(_) => raw.to_string(),
            None => format!("{HTTP_SCHEME}{raw}"),
        };
        Self { url }
    }

    /// Parses one line of an input list.
    ///
    /// Returns `None` for blank lines and `#` comments, which are not targets.
    pub fn from_line(line: &str) -> Option<Self> {
        let line: &str = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return None;
        }
        Some(Self::normalize(line))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The target as it appears in result lines: the URL without its scheme.
    pub fn host(&self) -> &str {
        match scheme_len(&self.url) {
            Some(len) => &self.url[len..],
            None => &self.url,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Length of a leading `http://` or `https://`, compared ASCII case-insensitively.
fn scheme_len(s: &str) -> Option<usize> {
    [HTTP_SCHEME, HTTPS_SCHEME].into_iter().find_map(|scheme| {
        s.get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .map(|_| scheme.len())
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_missing_scheme() {
        assert_eq!(Target::normalize("a.example").url(), "http://a.example");
        assert_eq!(Target::normalize("10.0.0.1").url(), "http://10.0.0.1");
        assert_eq!(Target::normalize("10.0.0.1:8080").url(), "http://10.0.0.1:8080");
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        assert_eq!(Target::normalize("http://b.example").url(), "http://b.example");
        assert_eq!(Target::normalize("https://c.example").url(), "https://c.example");
        assert_eq!(Target::normalize("HTTPS://d.example").url(), "HTTPS://d.example");
    }

    #[test]
    fn normalize_trims_surrounding_whitespace() {
        assert_eq!(Target::normalize("  a.example\r").url(), "http://a.example");
    }

    #[test]
    fn host_strips_exactly_one_scheme() {
        assert_eq!(Target::normalize("a.example").host(), "a.example");
        assert_eq!(Target::normalize("https://c.example").host(), "c.example");
        assert_eq!(Target::normalize("Http://e.example/x").host(), "e.example/x");
        assert_eq!(
            Target::normalize("http://http://f.example").host(),
            "http://f.example"
        );
    }

    #[test]
    fn from_line_skips_blanks_and_comments() {
        assert!(Target::from_line("").is_none());
        assert!(Target::from_line("   \t").is_none());
        assert!(Target::from_line("# cloud ranges").is_none());
        assert_eq!(
            Target::from_line(" a.example "),
            Some(Target::normalize("a.example"))
        );
    }

    #[test]
    fn malformed_entries_still_become_targets() {
        let target = Target::normalize("not a host");
        assert_eq!(target.url(), "http://not a host");
        assert_eq!(target.to_string(), "http://not a host");
    }

    #[test]
    fn scheme_detection_handles_short_and_multibyte_input() {
        assert_eq!(Target::normalize("h").url(), "http://h");
        assert_eq!(Target::normalize("ünïcødé.example").host(), "ünïcødé.example");
    }
}
