//! Classification of tracking targets by serving origin.

use url::Url;

/// Whether `url` points at one of the trusted internal proxy origins.
///
/// Matches on scheme, host and effective port. Unparseable URLs are never
/// classified as a proxy origin.
pub fn is_proxy_origin(url: &str, proxy_origins: &[Url]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    proxy_origins
        .iter()
        .any(|origin| same_origin(&parsed, origin))
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}
