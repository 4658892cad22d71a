use axum::http::HeaderMap;
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::users::model::Role;

/// The caller resolved from a request's bearer token, attached to the
/// GraphQL context before execution. Absent for anonymous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

/// Resolve the caller from the `Authorization: Bearer <token>` header.
///
/// This runs on every request, so the role gate always has an identity to
/// check when the client presented a valid token. Missing headers and
/// invalid tokens both yield an anonymous request; guarded fields then
/// reject with an authorization error.
pub fn bearer_identity(headers: &HeaderMap, keys: &JwtKeys) -> Option<Identity> {
    let auth = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))?;
    match keys.verify(token) {
        Ok(claims) => Some(Identity {
            user_id: claims.sub,
            role: claims.role,
        }),
        Err(_) => {
            warn!("invalid or expired token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::header::AUTHORIZATION;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn missing_header_is_anonymous() {
        let keys = make_keys();
        assert_eq!(bearer_identity(&HeaderMap::new(), &keys), None);
    }

    #[test]
    fn non_bearer_scheme_is_anonymous() {
        let keys = make_keys();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_identity(&headers, &keys), None);
    }

    #[test]
    fn garbage_token_is_anonymous() {
        let keys = make_keys();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer nope".parse().unwrap());
        assert_eq!(bearer_identity(&headers, &keys), None);
    }

    #[test]
    fn valid_bearer_resolves_id_and_role() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, Role::Admin).expect("sign");
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        let identity = bearer_identity(&headers, &keys).expect("identity");
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Admin);
    }
}
