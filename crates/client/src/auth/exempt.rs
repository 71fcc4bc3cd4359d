//! Endpoints exempt from credential handling
//!
//! The endpoints that create or renew a credential cannot themselves require
//! one. Requests to these paths are sent without an `Authorization` header,
//! and a 401 from them is a terminal answer, never an expiry signal.

use wareflow_domain::constants::{AUTH_LOGIN_PATH, AUTH_REFRESH_PATH, AUTH_REGISTER_PATH};

/// Path markers identifying credential-exempt endpoints
pub const EXEMPT_PATH_MARKERS: [&str; 3] =
    [AUTH_LOGIN_PATH, AUTH_REGISTER_PATH, AUTH_REFRESH_PATH];

/// Whether the given request path bypasses bearer decoration and
/// 401-driven renewal
///
/// Matching is by substring so versioned or prefixed routes
/// (e.g., `/v2/auth/login`) are covered as well.
#[must_use]
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATH_MARKERS.iter().any(|marker| path.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_endpoints_are_exempt() {
        assert!(is_exempt("/auth/login"));
        assert!(is_exempt("/auth/register"));
        assert!(is_exempt("/auth/refresh"));
    }

    #[test]
    fn prefixed_and_suffixed_variants_are_exempt() {
        assert!(is_exempt("/v2/auth/login"));
        assert!(is_exempt("/auth/refresh?source=background"));
    }

    #[test]
    fn business_endpoints_are_not_exempt() {
        assert!(!is_exempt("/orders"));
        assert!(!is_exempt("/stock/levels"));
        assert!(!is_exempt("/users/me"));
    }

    #[test]
    fn partial_marker_overlap_is_not_exempt() {
        assert!(!is_exempt("/auth/log"));
        assert!(!is_exempt("/authors"));
    }
}
