//! Post-login redirect target sanitization.
//!
//! The auth callback accepts a caller-supplied `next` path. Only relative
//! same-origin paths are honored; anything else falls back to the default
//! so the redirect target can never leave the application origin.

/// Where the auth callback sends users when `next` is absent or unsafe.
pub const DEFAULT_NEXT_PATH: &str = "/dashboard";

/// Sanitize a caller-supplied post-login path.
///
/// A safe path starts with exactly one `/`. Protocol-relative paths
/// (`//host`), absolute URLs, backslash variants, and empty values all
/// resolve to [`DEFAULT_NEXT_PATH`].
pub fn sanitize_next_path(raw: &str) -> &str {
    if raw.starts_with('/') && !raw.starts_with("//") && !raw.starts_with("/\\") {
        raw
    } else {
        DEFAULT_NEXT_PATH
    }
}
