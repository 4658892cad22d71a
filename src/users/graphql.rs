use async_graphql::{Context, ErrorExtensions, Object, Result};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::users::model::{is_valid_email, CreateUserInput, UserView};
use crate::users::repo;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<UserView>> {
        let db = ctx.data_unchecked::<PgPool>();
        let users = repo::list_all(db).await.map_err(|e| e.extend())?;
        Ok(users.into_iter().map(UserView::from).collect())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, data: CreateUserInput) -> Result<UserView> {
        let email = data.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            warn!(email = %email, "create_user invalid email");
            return Err(ApiError::Validation("invalid email".into()).extend());
        }
        if data.password.len() < 8 {
            warn!("create_user password too short");
            return Err(ApiError::Validation("password too short".into()).extend());
        }

        let db = ctx.data_unchecked::<PgPool>();
        if repo::find_by_email(db, &email)
            .await
            .map_err(|e| e.extend())?
            .is_some()
        {
            warn!(email = %email, "create_user email already registered");
            return Err(ApiError::Validation("email already registered".into()).extend());
        }

        // The only place a plaintext password is ever hashed.
        let hash = hash_password(&data.password)
            .map_err(ApiError::Internal)
            .map_err(|e| e.extend())?;

        let user = repo::create(db, &data.firstname, &data.lastname, &email, &hash, data.role)
            .await
            .map_err(|e| e.extend())?;
        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(UserView::from(user))
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let db = ctx.data_unchecked::<PgPool>();
        if !repo::delete(db, id).await.map_err(|e| e.extend())? {
            return Err(ApiError::NotFound("user").extend());
        }
        info!(user_id = %id, "user deleted");
        Ok(true)
    }
}
