//! String-level URL resolution against a page location.

/// Strip the last path segment from a URL, leaving its directory.
///
/// No-op when the URL contains no slash at all.
pub fn basename(url: &str) -> &str {
    match url.rfind('/') {
        Some(index) => &url[..index],
        None => url,
    }
}

/// Resolve a URL lacking a scheme against the current page location:
/// the location's last segment is replaced by the relative URL. URLs that
/// already carry an `http(s)` scheme pass through untouched.
pub fn resolve(url: &str, location: &str) -> String {
    if url.starts_with("http:") || url.starts_with("https:") {
        return url.to_string();
    }
    match location.rfind('/') {
        Some(index) => format!("{}/{url}", &location[..index]),
        None => format!("{location}{url}"),
    }
}
