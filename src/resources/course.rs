use async_graphql::{
    ComplexObject, Context, ErrorExtensions, InputObject, Object, Result, SimpleObject,
};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::guard::RoleGuard;
use crate::error::ApiError;
use crate::resources;
use crate::users::model::{Role, UserView};
use crate::users::repo as users_repo;

const COURSE_COLUMNS: &str =
    "id, description, duration, initial_date, final_date, user_id, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub description: String,
    pub duration: String,
    pub initial_date: String,
    pub final_date: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Course", complex)]
pub struct CourseView {
    pub id: Uuid,
    pub description: String,
    pub duration: String,
    pub initial_date: String,
    pub final_date: String,
    pub created_at: OffsetDateTime,
    #[graphql(skip)]
    pub user_id: Uuid,
}

#[ComplexObject]
impl CourseView {
    /// The owning user. Every course references exactly one user, so a
    /// dangling reference is an error rather than a null.
    async fn user(&self, ctx: &Context<'_>) -> Result<UserView> {
        let db = ctx.data_unchecked::<PgPool>();
        let user = users_repo::find_by_id(db, self.user_id)
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| ApiError::NotFound("course owner").extend())?;
        Ok(UserView::from(user))
    }
}

impl From<Course> for CourseView {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            description: course.description,
            duration: course.duration,
            initial_date: course.initial_date,
            final_date: course.final_date,
            created_at: course.created_at,
            user_id: course.user_id,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct CourseOwnerInput {
    pub id: Uuid,
}

#[derive(Debug, InputObject)]
pub struct CreateCourseInput {
    pub description: String,
    pub duration: String,
    pub initial_date: String,
    pub final_date: String,
    pub user: CourseOwnerInput,
}

pub(crate) async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Course>, ApiError> {
    let courses = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = $1 ORDER BY created_at"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(courses)
}

async fn insert(db: &PgPool, data: &CreateCourseInput) -> Result<Course, ApiError> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO courses (description, duration, initial_date, final_date, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(&data.description)
    .bind(&data.duration)
    .bind(&data.initial_date)
    .bind(&data.final_date)
    .bind(data.user.id)
    .fetch_one(db)
    .await?;
    Ok(course)
}

#[derive(Default)]
pub struct CourseQuery;

#[Object]
impl CourseQuery {
    async fn all_courses(&self, ctx: &Context<'_>) -> Result<Vec<CourseView>> {
        let db = ctx.data_unchecked::<PgPool>();
        let courses = resources::list_all::<Course>(
            db,
            &format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at"),
        )
        .await
        .map_err(|e| e.extend())?;
        Ok(courses.into_iter().map(CourseView::from).collect())
    }
}

#[derive(Default)]
pub struct CourseMutation;

#[Object]
impl CourseMutation {
    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn create_course(&self, ctx: &Context<'_>, data: CreateCourseInput) -> Result<CourseView> {
        let db = ctx.data_unchecked::<PgPool>();
        if users_repo::find_by_id(db, data.user.id)
            .await
            .map_err(|e| e.extend())?
            .is_none()
        {
            return Err(ApiError::Validation("owning user does not exist".into()).extend());
        }
        let course = insert(db, &data).await.map_err(|e| e.extend())?;
        info!(course_id = %course.id, user_id = %course.user_id, "course created");
        Ok(CourseView::from(course))
    }

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn delete_course(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let db = ctx.data_unchecked::<PgPool>();
        if !resources::delete_by_id(db, "courses", id)
            .await
            .map_err(|e| e.extend())?
        {
            return Err(ApiError::NotFound("course").extend());
        }
        info!(course_id = %id, "course deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, JwtConfig, Variant};
    use crate::schema::AppSchema;
    use crate::state::test_db;
    use async_graphql::Request;
    use std::sync::Arc;

    fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
            variant: Variant::Courses,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
        })
    }

    #[tokio::test]
    async fn created_course_owner_resolves_back_to_the_same_user() {
        let Some(pool) = test_db::pool().await else { return };

        let email = format!("{}@course.test", Uuid::new_v4());
        let owner = users_repo::create(&pool, "Ana", "Silva", &email, "placeholder-hash", Role::Admin)
            .await
            .expect("create owner");

        let course = insert(
            &pool,
            &CreateCourseInput {
                description: "Backend development".into(),
                duration: "40h".into(),
                initial_date: "2026-09-01".into(),
                final_date: "2026-10-01".into(),
                user: CourseOwnerInput { id: owner.id },
            },
        )
        .await
        .expect("insert course");

        let schema = AppSchema::build(Variant::Courses, pool.clone(), test_config());
        let response = schema
            .execute(Request::new("{ allCourses { id user { id } } }"))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let data = response.data.into_json().expect("json data");
        let listed = data["allCourses"]
            .as_array()
            .expect("course list")
            .iter()
            .find(|c| c["id"] == serde_json::json!(course.id))
            .expect("created course is listed")
            .clone();
        assert_eq!(listed["user"]["id"], serde_json::json!(owner.id));

        // Cascades over the course row too.
        assert!(users_repo::delete(&pool, owner.id).await.expect("cleanup"));
    }
}
