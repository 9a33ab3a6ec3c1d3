use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};

use stockroom_core::SessionId;

use crate::context::SessionContext;

pub const SESSION_COOKIE: &str = "stockroom_session";

/// Attach a `SessionContext` to every request.
///
/// Reuses the session cookie when it holds a valid id; otherwise starts a fresh
/// session and sets the cookie on the response.
pub async fn session_middleware(mut req: Request, next: Next) -> Response {
    let (session_id, is_new) = match session_from_cookies(req.headers()) {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };

    req.extensions_mut().insert(SessionContext::new(session_id));
    let mut response = next.run(req).await;

    if is_new {
        tracing::debug!(session = %session_id, "started session");
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

fn session_from_cookies(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        map
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let id = SessionId::new();
        let found = session_from_cookies(&headers(&format!(
            "theme=dark; {SESSION_COOKIE}={id}; lang=pl"
        )));
        assert_eq!(found, Some(id));
    }

    #[test]
    fn invalid_or_missing_cookie_yields_none() {
        assert_eq!(session_from_cookies(&HeaderMap::new()), None);
        assert_eq!(
            session_from_cookies(&headers(&format!("{SESSION_COOKIE}=forged"))),
            None
        );
    }
}
