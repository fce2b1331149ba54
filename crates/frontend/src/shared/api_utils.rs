//! API utilities for frontend-backend communication

/// Port of the analytics API server
pub const API_PORT: u16 = 8080;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location, using the
/// analytics server port and the `/api` prefix.
///
/// # Returns
/// - API base URL like "http://localhost:8080/api"
/// - "/api" if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return "/api".to_string(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    base_for(&protocol, &hostname)
}

fn base_for(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}/api", protocol, hostname, API_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_for() {
        assert_eq!(base_for("http:", "localhost"), "http://localhost:8080/api");
        assert_eq!(base_for("https:", "example.com"), "https://example.com:8080/api");
    }
}
