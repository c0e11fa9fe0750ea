//! Path normalization
//!
//! Normalized paths are the sole key-equality basis for route lookup and
//! middleware prefix matching: the same function runs over registration-time
//! and request-time paths, so exact-match comparison is well defined.

/// Canonicalize a route or request path.
///
/// The root path `/` is returned unchanged; any other path loses a single
/// trailing `/`. No segment collapsing and no percent-decoding happen here.
pub fn normalize_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }
    match path.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_unchanged() {
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        assert_eq!(normalize_path("/users/"), "/users");
        assert_eq!(normalize_path("/api/v1/"), "/api/v1");
    }

    #[test]
    fn test_plain_path_is_unchanged() {
        assert_eq!(normalize_path("/users"), "/users");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("*"), "*");
    }

    #[test]
    fn test_only_one_slash_is_stripped() {
        // Repeated slashes are not collapsed
        assert_eq!(normalize_path("/users//"), "/users/");
    }

    #[test]
    fn test_idempotence() {
        for path in ["/", "/users", "/users/", "/a/b/c/", "", "//"] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once, "normalize({:?})", path);
        }
    }

    #[test]
    fn test_non_root_never_ends_with_slash() {
        for path in ["/users/", "/a/", "/a/b/"] {
            assert!(!normalize_path(path).ends_with('/'));
        }
    }
}
