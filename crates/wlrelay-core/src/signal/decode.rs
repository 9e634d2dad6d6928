//! Host-side recognition of sentinel transfers.
//!
//! The host application receives every failed transfer of its background
//! session, not only ours, so the sentinel shape is checked before the
//! `website` parameter is trusted.

use url::Url;

use super::{SENTINEL_HOST, SENTINEL_PATH_PREFIX, SENTINEL_SCHEME, WEBSITE_PARAM};
use crate::hostname::{canonicalize, CanonicalHostname};

/// Decode the whitelist key carried by a failed transfer's URI.
///
/// Returns `None` for anything that is not a sentinel or whose `website`
/// parameter is missing or not a usable host. Decoding the same URI twice
/// gives the same key.
pub fn decode_signal(url: &Url) -> Option<CanonicalHostname> {
    if url.scheme() != SENTINEL_SCHEME
        || url.host_str() != Some(SENTINEL_HOST)
        || !url.path().starts_with(SENTINEL_PATH_PREFIX)
    {
        return None;
    }
    let website = url
        .query_pairs()
        .find(|(k, _)| k == WEBSITE_PARAM)
        .map(|(_, v)| v.into_owned())?;
    canonicalize(&website)
}

/// Receiver of failed transfers redelivered to the host's background session.
pub trait HostSignalDecoder {
    fn on_failed_transfer(&mut self, url: &Url);
}

/// Collects decoded hostnames in arrival order, each once.
#[derive(Debug, Default)]
pub struct WhitelistCollector {
    hostnames: Vec<CanonicalHostname>,
}

impl WhitelistCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostnames(&self) -> &[CanonicalHostname] {
        &self.hostnames
    }

    pub fn into_hostnames(self) -> Vec<CanonicalHostname> {
        self.hostnames
    }
}

impl HostSignalDecoder for WhitelistCollector {
    fn on_failed_transfer(&mut self, url: &Url) {
        match decode_signal(url) {
            Some(host) if !self.hostnames.contains(&host) => {
                tracing::info!(hostname = %host, "whitelist signal decoded");
                self.hostnames.push(host);
            }
            Some(host) => tracing::debug!(hostname = %host, "duplicate whitelist signal"),
            None => tracing::debug!(url = %url, "ignoring non-sentinel failed transfer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{encode, WhitelistSignal};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn decodes_what_the_encoder_builds() {
        let host = canonicalize("https://www.Example.com/page").unwrap();
        let encoded = encode(&WhitelistSignal::new(host.clone(), 1_700_000_123)).unwrap();
        assert_eq!(decode_signal(&encoded.url), Some(host));
    }

    #[test]
    fn rejects_non_sentinel_shapes() {
        let rejected = [
            "https://localhost/invalidimage-1.png?website=example.com",
            "http://example.com/invalidimage-1.png?website=example.com",
            "http://localhost/image-1.png?website=example.com",
            "http://localhost/invalidimage-1.png",
            "http://localhost/invalidimage-1.png?website=",
        ];
        for s in rejected {
            assert_eq!(decode_signal(&url(s)), None, "url {s}");
        }
    }

    #[test]
    fn decoding_is_idempotent() {
        let u = url("http://localhost/invalidimage-7.png?website=b%C3%BCcher.de");
        let first = decode_signal(&u);
        assert_eq!(first.as_ref().map(|h| h.as_str()), Some("bücher.de"));
        assert_eq!(decode_signal(&u), first);
    }

    #[test]
    fn collector_keeps_first_occurrence_only() {
        let mut collector = WhitelistCollector::new();
        collector.on_failed_transfer(&url("http://localhost/invalidimage-1.png?website=a.com"));
        collector.on_failed_transfer(&url("https://cdn.example.net/real.png"));
        collector.on_failed_transfer(&url("http://localhost/invalidimage-2.png?website=b.org"));
        collector.on_failed_transfer(&url("http://localhost/invalidimage-3.png?website=a.com"));

        let hosts: Vec<&str> = collector.hostnames().iter().map(|h| h.as_str()).collect();
        assert_eq!(hosts, ["a.com", "b.org"]);
    }
}
