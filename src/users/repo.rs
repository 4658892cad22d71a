use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::model::{Role, User};

const USER_COLUMNS: &str = "id, firstname, lastname, email, password_hash, role, created_at";

pub async fn list_all(db: &PgPool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
    ))
    .fetch_all(db)
    .await?;
    Ok(users)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn create(
    db: &PgPool,
    firstname: &str,
    lastname: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (firstname, lastname, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(firstname)
    .bind(lastname)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        // unique_violation on users.email
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            ApiError::Validation("email already registered".into())
        }
        _ => ApiError::Database(e),
    })?;
    Ok(user)
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_db;

    #[tokio::test]
    async fn delete_of_unknown_id_reports_absence_twice_and_touches_nothing() {
        let Some(pool) = test_db::pool().await else { return };

        let email = format!("{}@repo.test", Uuid::new_v4());
        let user = create(&pool, "Ana", "Silva", &email, "placeholder-hash", Role::User)
            .await
            .expect("create user");

        let ghost = Uuid::new_v4();
        assert!(!delete(&pool, ghost).await.expect("first delete"));
        // Deleting an already-absent id reports the same.
        assert!(!delete(&pool, ghost).await.expect("second delete"));

        // Existing records are untouched by the failed deletes.
        assert!(find_by_id(&pool, user.id)
            .await
            .expect("find user")
            .is_some());

        assert!(delete(&pool, user.id).await.expect("cleanup"));
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_a_validation_error() {
        let Some(pool) = test_db::pool().await else { return };

        let email = format!("{}@repo.test", Uuid::new_v4());
        let user = create(&pool, "Ana", "Silva", &email, "placeholder-hash", Role::User)
            .await
            .expect("create user");

        let err = create(&pool, "Ana", "Silva", &email, "placeholder-hash", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(delete(&pool, user.id).await.expect("cleanup"));
    }
}
