//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/entries/{entry_id}', use [format_endpoint].

/// The route for checking that the server is running.
pub const HEALTH: &str = "/health";
/// The route for showing the server's settings outside of production.
pub const DEBUG_ENV: &str = "/debug/env";
/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route to create and list entries.
pub const ENTRIES: &str = "/api/entries";
/// The route to get, update and delete a single entry.
pub const ENTRY: &str = "/api/entries/{entry_id}";
/// The route for the summary of a user's entries.
pub const ENTRIES_SUMMARY: &str = "/api/entries/summary/stats";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// The parameter is everything between the first `{` and the following `}`.
/// If `endpoint_path` has no parameter, it is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_owned(),
    };

    let end = match endpoint_path[start..].find('}') {
        Some(offset) => start + offset + 1,
        None => return endpoint_path.to_owned(),
    };

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}

#[cfg(test)]
mod tests {
    use super::{ENTRIES, ENTRY, format_endpoint};

    #[test]
    fn formats_entry_path() {
        assert_eq!(format_endpoint(ENTRY, 42), "/api/entries/42");
    }

    #[test]
    fn path_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint(ENTRIES, 42), ENTRIES);
    }
}
