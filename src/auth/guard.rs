use async_graphql::{Context, ErrorExtensions, Guard};

use crate::auth::identity::Identity;
use crate::error::ApiError;
use crate::users::model::Role;

/// Field-level role gate. Protected operations declare their required role
/// with `#[graphql(guard = "RoleGuard::new(Role::Admin)")]`; the check runs
/// before the resolver, so a rejected call performs no persistence work.
pub struct RoleGuard {
    role: Role,
}

impl RoleGuard {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

impl Guard for RoleGuard {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        require_role(ctx.data_opt::<Identity>(), self.role).map_err(|e| e.extend())
    }
}

/// The single authorization decision: the resolved caller must hold exactly
/// the required role. Roles are disjoint; ADMIN does not imply USER.
pub fn require_role(identity: Option<&Identity>, required: Role) -> Result<(), ApiError> {
    match identity {
        Some(identity) if identity.role == required => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn anonymous_is_rejected() {
        let err = require_role(None, Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn wrong_role_is_rejected() {
        let caller = identity(Role::User);
        let err = require_role(Some(&caller), Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn roles_are_disjoint_both_ways() {
        let admin = identity(Role::Admin);
        assert!(require_role(Some(&admin), Role::User).is_err());
    }

    #[test]
    fn matching_role_passes() {
        let caller = identity(Role::Admin);
        assert!(require_role(Some(&caller), Role::Admin).is_ok());
    }
}
