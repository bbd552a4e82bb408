//! Cookie header parsing and `Set-Cookie` construction
//!
//! All cookies are `HttpOnly; SameSite=Lax; Path=/`, plus `Secure` in production.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use tracing::warn;

/// Lifetime of the refresh token cookie (30 days)
pub const REFRESH_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Lifetime of the login state and redirect cookies
pub const LOGIN_MAX_AGE_SECS: i64 = 10 * 60;

/// Value of cookie `name` from the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value storing `value` for `max_age_secs`
pub fn set_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value deleting cookie `name`
pub fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", 0, secure)
}

/// Whether a value can be stored in a cookie without encoding
pub fn is_cookie_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b';' | b',' | b'"' | b'\\'))
}

/// Append `Set-Cookie` headers to a response
pub fn append_cookies(mut response: Response, cookies: &[String]) -> Response {
    let headers = response.headers_mut();
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Dropping unrepresentable cookie"),
        }
    }
    response
}
