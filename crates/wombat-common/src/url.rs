//! URL resolution utilities.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Fetching is done by a collaborator outside the engine; this module only
//! turns an `href` found in a document into the string that collaborator is
//! asked to fetch.

/// Resolve a potentially relative URL against a base URL.
///
/// Handles absolute URLs, protocol-relative (`//host/x`), root-relative
/// (`/x`) and path-relative (`x`, `./x`, `../x`) references. Query strings
/// and fragments on the base are ignored when computing the base directory.
///
/// NOTE: This is a simplified implementation. Full URL resolution requires
/// implementing the URL Standard's URL parsing algorithm.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    let href = href.trim();

    // STEP 1: Absolute URLs resolve to themselves.
    if is_absolute(href) {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    // STEP 2: Split the base into origin and path.
    let (origin, path) = split_origin(base);

    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative URL - reuse the base scheme
        let scheme = base.split_once("://").map_or("http", |(scheme, _)| scheme);
        return format!("{scheme}://{rest}");
    }

    if href.starts_with('/') {
        return format!("{origin}{href}");
    }

    // STEP 3: Path-relative URL - join with the base directory, consuming
    // leading `./` and `../` segments.
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut dir = path.rsplit_once('/').map_or("", |(dir, _)| dir);
    let mut rest = href;
    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
            dir = dir.rsplit_once('/').map_or("", |(parent, _)| parent);
        } else if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else {
            break;
        }
    }

    if origin.is_empty() && dir.is_empty() && !path.starts_with('/') {
        return rest.to_string();
    }
    format!("{origin}{dir}/{rest}")
}

/// Split a URL at its first `#` into the part to fetch and the fragment.
///
/// An empty fragment (`page.html#`) is dropped.
#[must_use]
pub fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((resource, fragment)) if !fragment.is_empty() => (resource, Some(fragment)),
        Some((resource, _)) => (resource, None),
        None => (url, None),
    }
}

/// Whether `href` carries its own scheme.
fn is_absolute(href: &str) -> bool {
    href.contains("://")
        || href.starts_with("data:")
        || href.starts_with("about:")
        || href.starts_with("file:")
}

/// Split `scheme://host[:port]/path` into (`scheme://host[:port]`, `/path`).
///
/// Bases without a scheme (plain filesystem paths) have an empty origin.
fn split_origin(base: &str) -> (&str, &str) {
    let Some(scheme_end) = base.find("://") else {
        return ("", base);
    };
    let after_scheme = &base[scheme_end + 3..];
    after_scheme
        .find('/')
        .map_or((base, ""), |path_start| base.split_at(scheme_end + 3 + path_start))
}
