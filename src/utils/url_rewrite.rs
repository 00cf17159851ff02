//! URL surgery for the impression handshake.

use url::Url;

/// Merges the query parameters of `location` onto `current`.
///
/// # Merge Rules
///
/// 1. Only the query string of `location` is adopted; its scheme, host and
///    path are ignored
/// 2. Keys already present on `current` are overridden
/// 3. New keys are appended in `location` order
/// 4. The path and fragment of `current` are preserved
///
/// # Errors
///
/// Returns the parse error when `location` is not an absolute URL.
pub fn merge_location_params(current: &Url, location: &str) -> Result<Url, url::ParseError> {
    let location = Url::parse(location)?;
    let incoming: Vec<(String, String)> = location.query_pairs().into_owned().collect();
    if incoming.is_empty() {
        return Ok(current.clone());
    }

    let kept: Vec<(String, String)> = current
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| !incoming.iter().any(|(new_key, _)| new_key == key))
        .collect();

    let mut merged = current.clone();
    {
        let mut pairs = merged.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(kept);
        pairs.extend_pairs(incoming);
    }
    Ok(merged)
}

/// Rewrites a click URL to the local development proxy, carrying the original
/// URL as the `url` query parameter.
pub fn to_dev_proxy(proxy: &Url, click_url: &str) -> Url {
    let mut rewritten = proxy.clone();
    rewritten.query_pairs_mut().append_pair("url", click_url);
    rewritten
}
