use axum::http::{header::COOKIE, HeaderMap};

pub const AUTH_COOKIE: &str = "auth_token";
pub const HUMAN_COOKIE: &str = "human_verified";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Find a cookie value across every `Cookie` header on the request
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value scoped to the whole site with `SameSite=Lax`
pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, http_only: bool, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; Max-Age={}; SameSite=Lax", name, value, max_age_secs);
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expire_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, true, secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; auth_token=abc.def.ghi;human_verified=true"));

        assert_eq!(read_cookie(&headers, AUTH_COOKIE).as_deref(), Some("abc.def.ghi"));
        assert_eq!(read_cookie(&headers, HUMAN_COOKIE).as_deref(), Some("true"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("not_human_verified=true"));
        assert_eq!(read_cookie(&headers, HUMAN_COOKIE), None);
    }

    #[test]
    fn searches_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("auth_token=xyz"));
        assert_eq!(read_cookie(&headers, AUTH_COOKIE).as_deref(), Some("xyz"));
    }

    #[test]
    fn builds_session_cookie() {
        let cookie = build_cookie(AUTH_COOKIE, "tok", 604800, true, true);
        assert_eq!(cookie, "auth_token=tok; Path=/; Max-Age=604800; SameSite=Lax; HttpOnly; Secure");

        let expired = expire_cookie(AUTH_COOKIE, false);
        assert_eq!(expired, "auth_token=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly");
    }
}
