use async_graphql::{ComplexObject, Context, Enum, ErrorExtensions, InputObject, Result, SimpleObject};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::resources::course::{self, CourseView};

/// Caller role. The two roles are disjoint; the role gate matches exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

/// Storage record. Carries the password hash, so it is never exposed over
/// GraphQL directly; responses go through [`UserView`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

/// Public projection of a user. No password field, by construction.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User", complex)]
pub struct UserView {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

#[ComplexObject]
impl UserView {
    /// Courses owned by this user. Empty in the products variant, where no
    /// course records exist.
    async fn courses(&self, ctx: &Context<'_>) -> Result<Vec<CourseView>> {
        let db = ctx.data_unchecked::<PgPool>();
        let courses = course::list_by_user(db, self.id)
            .await
            .map_err(|e| e.extend())?;
        Ok(courses.into_iter().map(CourseView::from).collect())
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct CreateUserInput {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
