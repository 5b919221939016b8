//! Caller identity middleware.
//!
//! Authentication and authorization live in an upstream gateway; by the time
//! a request reaches this service the gateway has verified the caller and
//! stamped `X-User-Id` and `X-User-Role` headers. This middleware only
//! parses that trusted identity and enforces the admin flag where required.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the verified caller id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Header carrying the verified caller role.
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// The caller's identity, as asserted by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub is_admin: bool,
}

fn extract_identity(req: &Request<Body>) -> Result<Identity, ApiError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid caller identity".into()))?;

    let is_admin = req
        .headers()
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|role| role.eq_ignore_ascii_case("admin"))
        .unwrap_or(false);

    Ok(Identity { user_id, is_admin })
}

/// Middleware requiring an authenticated member.
pub async fn require_member(mut req: Request<Body>, next: Next) -> Response {
    match extract_identity(&req) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

/// Middleware requiring an authenticated admin.
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Response {
    match extract_identity(&req) {
        Ok(identity) if identity.is_admin => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Ok(_) => ApiError::Forbidden("Admin role required".into()).into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request_with(headers: &[(&str, &str)]) -> Request<Body> {
        let mut req = Request::new(Body::empty());
        for (name, value) in headers {
            req.headers_mut().insert(
                axum::http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        req
    }

    #[test]
    fn test_extract_member_identity() {
        let id = Uuid::new_v4();
        let req = request_with(&[("x-user-id", &id.to_string()), ("x-user-role", "member")]);
        let identity = extract_identity(&req).unwrap();
        assert_eq!(identity.user_id, id);
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_extract_admin_identity() {
        let id = Uuid::new_v4();
        let req = request_with(&[("x-user-id", &id.to_string()), ("x-user-role", "Admin")]);
        let identity = extract_identity(&req).unwrap();
        assert!(identity.is_admin);
    }

    #[test]
    fn test_missing_identity_rejected() {
        let req = request_with(&[("x-user-role", "admin")]);
        assert!(extract_identity(&req).is_err());

        let req = request_with(&[("x-user-id", "not-a-uuid")]);
        assert!(extract_identity(&req).is_err());
    }
}
