//! Hash extraction from short URLs.

/// Returns the last `/`-separated segment of `url_or_hash`.
///
/// Accepts either a full short URL (`http://bit.ly/3CzY1f`) or a bare hash
/// (`3CzY1f`). This is string splitting, not URL parsing: query strings are
/// kept and a trailing slash yields an empty hash.
pub fn hash_from_url(url_or_hash: &str) -> &str {
    url_or_hash.rsplit('/').next().unwrap_or(url_or_hash)
}
