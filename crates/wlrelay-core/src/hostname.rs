//! Hostname canonicalization.
//!
//! Reduces an arbitrary page URI to the key the host application whitelists
//! under: the bare host, lower-cased, with one leading `www.` label removed.
//! Port, userinfo, path, query and fragment never take part in the key.

use std::fmt;

const WWW_LABEL: &str = "www.";

/// A validated whitelist key. Non-empty and lower-case; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalHostname(String);

impl CanonicalHostname {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalHostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a page URI (or a bare host) into a whitelist key.
///
/// Returns `None` when the input is empty, is not a URI with a host, or
/// reduces to an empty host. IP literals and internationalized labels are
/// only case-folded; no punycode conversion happens here.
///
/// A bare host such as `Example.com` is read as `http://Example.com`, so a
/// canonical key fed back in comes out unchanged, except for hosts with
/// repeated leading `www.` labels: each pass removes only one of them.
pub fn canonicalize(raw: &str) -> Option<CanonicalHostname> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    let (source, parsed) = match url::Url::parse(input) {
        Ok(parsed) => (input.to_string(), parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let prefixed = format!("http://{input}");
            let parsed = url::Url::parse(&prefixed).ok()?;
            (prefixed, parsed)
        }
        Err(_) => return None,
    };

    let parsed_host = parsed.host_str().filter(|h| !h.is_empty())?;

    // The url crate punycodes internationalized hosts; keep those as
    // written. Anything else the parser normalized (stripped tabs and
    // newlines, percent-escapes, IPv4 forms) comes from the parsed host.
    let host = match raw_host(&source) {
        Some(h) if !h.is_ascii() && !h.chars().any(is_rewritten_by_parser) => h,
        _ => parsed_host,
    };

    let lowered = host.to_lowercase();
    let stripped = lowered.strip_prefix(WWW_LABEL).unwrap_or(&lowered);
    if stripped.is_empty() {
        return None;
    }
    Some(CanonicalHostname(stripped.to_string()))
}

fn is_rewritten_by_parser(c: char) -> bool {
    c == '%' || c.is_control() || c.is_whitespace()
}

/// Host text of `scheme://[userinfo@]host[:port]...` exactly as written.
fn raw_host(uri: &str) -> Option<&str> {
    let (_, rest) = uri.split_once("://")?;
    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#' | '\\'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority
        .rsplit_once('@')
        .map(|(_, hp)| hp)
        .unwrap_or(authority);

    if host_port.starts_with('[') {
        let close = host_port.find(']')?;
        return Some(&host_port[..=close]);
    }
    Some(
        host_port
            .split_once(':')
            .map(|(h, _)| h)
            .unwrap_or(host_port),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(s: &str) -> Option<String> {
        canonicalize(s).map(CanonicalHostname::into_string)
    }

    #[test]
    fn strips_www_and_lowercases() {
        assert_eq!(canon("WWW.Example.com").as_deref(), Some("example.com"));
        assert_eq!(canon("example.com").as_deref(), Some("example.com"));
        assert_eq!(
            canon("https://www.adblock-test.org").as_deref(),
            Some("adblock-test.org")
        );
    }

    #[test]
    fn hosts_without_www_are_only_lowercased() {
        for h in ["Sub.Example.ORG", "a.b.c.d", "wwwexample.com", "web.www.net"] {
            assert_eq!(canon(h), Some(h.to_lowercase()), "host {h}");
        }
    }

    #[test]
    fn only_one_www_label_is_removed() {
        assert_eq!(canon("www.www.example.com").as_deref(), Some("www.example.com"));
    }

    #[test]
    fn ignores_port_userinfo_path_query_fragment() {
        assert_eq!(
            canon("https://sub.Example.org/path?x=1").as_deref(),
            Some("sub.example.org")
        );
        assert_eq!(
            canon("http://user:pw@www.Example.com:8080/a#frag").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn empty_and_unparseable_inputs_yield_none() {
        assert_eq!(canon(""), None);
        assert_eq!(canon("   "), None);
        assert_eq!(canon("not a uri"), None);
        assert_eq!(canon("mailto:someone"), None);
        assert_eq!(canon("http://www."), None);
    }

    #[test]
    fn embedded_tabs_and_newlines_are_not_kept() {
        assert_eq!(canon("http://exa\tmple.com/").as_deref(), Some("example.com"));
        assert_eq!(canon("http://exa\nmple.com/").as_deref(), Some("example.com"));
        assert_eq!(canon("www.exa\r\nmple.com").as_deref(), Some("example.com"));
        let unicode = canon("https://bü\tcher.de/").unwrap();
        assert!(!unicode.contains('\t'), "got {unicode:?}");
    }

    #[test]
    fn ip_literals_pass_through() {
        assert_eq!(canon("http://192.168.0.1:81/").as_deref(), Some("192.168.0.1"));
        assert_eq!(canon("http://[::1]:8080/x").as_deref(), Some("[::1]"));
    }

    #[test]
    fn internationalized_labels_are_not_punycoded() {
        assert_eq!(canon("https://www.Bücher.de/").as_deref(), Some("bücher.de"));
    }

    #[test]
    fn canonical_output_is_a_fixed_point() {
        for input in [
            "https://WWW.Example.com/x",
            "http://sub.example.org:8080",
            "http://[::1]/",
            "https://Bücher.de",
        ] {
            let once = canonicalize(input).unwrap();
            let twice = canonicalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "input {input}");
        }
    }
}
