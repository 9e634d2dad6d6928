//! Sentinel URI construction.

use thiserror::Error;
use url::Url;

use super::{
    WhitelistSignal, SENTINEL_HOST, SENTINEL_PATH_PREFIX, SENTINEL_PATH_SUFFIX, SENTINEL_SCHEME,
    WEBSITE_PARAM,
};

/// Signal construction failed; the caller must treat it as "no signal".
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("sentinel URI could not be built: {0}")]
    Url(#[from] url::ParseError),
    #[error("encoded website {decoded:?} does not decode back to {expected:?}")]
    RoundTrip {
        expected: String,
        decoded: Option<String>,
    },
}

/// A signal together with the exact URI that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSignal {
    pub signal: WhitelistSignal,
    pub url: Url,
}

/// Build the sentinel URI for `signal`.
///
/// The hostname is percent-encoded into the `website` query parameter and
/// then decoded again; any mismatch aborts construction instead of sending
/// a different value.
pub fn encode(signal: &WhitelistSignal) -> Result<EncodedSignal, EncodeError> {
    let mut url = Url::parse(&format!("{SENTINEL_SCHEME}://{SENTINEL_HOST}/"))?;
    url.set_path(&format!(
        "{SENTINEL_PATH_PREFIX}{}{SENTINEL_PATH_SUFFIX}",
        signal.created_at()
    ));
    url.query_pairs_mut()
        .append_pair(WEBSITE_PARAM, signal.hostname().as_str());

    let decoded = url
        .query_pairs()
        .find(|(k, _)| k == WEBSITE_PARAM)
        .map(|(_, v)| v.into_owned());
    if decoded.as_deref() != Some(signal.hostname().as_str()) {
        return Err(EncodeError::RoundTrip {
            expected: signal.hostname().to_string(),
            decoded,
        });
    }

    Ok(EncodedSignal {
        signal: signal.clone(),
        url,
    })
}
