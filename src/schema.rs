use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Request, Response, Schema};
use sqlx::PgPool;

use crate::auth::graphql::AuthMutation;
use crate::auth::jwt::JwtKeys;
use crate::config::{AppConfig, Variant};
use crate::resources::course::{CourseMutation, CourseQuery};
use crate::resources::product::{ProductMutation, ProductQuery};
use crate::users::graphql::{UserMutation, UserQuery};

#[derive(MergedObject, Default)]
pub struct CoursesQueryRoot(UserQuery, CourseQuery);

#[derive(MergedObject, Default)]
pub struct CoursesMutationRoot(UserMutation, AuthMutation, CourseMutation);

pub type CoursesSchema = Schema<CoursesQueryRoot, CoursesMutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct ProductsQueryRoot(UserQuery, ProductQuery);

#[derive(MergedObject, Default)]
pub struct ProductsMutationRoot(UserMutation, AuthMutation, ProductMutation);

pub type ProductsSchema = Schema<ProductsQueryRoot, ProductsMutationRoot, EmptySubscription>;

/// The schema for the configured deployment variant. Exactly one resource
/// kind is exposed per process.
#[derive(Clone)]
pub enum AppSchema {
    Courses(CoursesSchema),
    Products(ProductsSchema),
}

impl AppSchema {
    pub fn build(variant: Variant, db: PgPool, config: Arc<AppConfig>) -> Self {
        let keys = JwtKeys::from_config(&config.jwt);
        match variant {
            Variant::Courses => AppSchema::Courses(
                Schema::build(
                    CoursesQueryRoot::default(),
                    CoursesMutationRoot::default(),
                    EmptySubscription,
                )
                .data(db)
                .data(config)
                .data(keys)
                .finish(),
            ),
            Variant::Products => AppSchema::Products(
                Schema::build(
                    ProductsQueryRoot::default(),
                    ProductsMutationRoot::default(),
                    EmptySubscription,
                )
                .data(db)
                .data(config)
                .data(keys)
                .finish(),
            ),
        }
    }

    pub async fn execute(&self, request: Request) -> Response {
        match self {
            AppSchema::Courses(schema) => schema.execute(request).await,
            AppSchema::Products(schema) => schema.execute(request).await,
        }
    }

    pub fn sdl(&self) -> String {
        match self {
            AppSchema::Courses(schema) => schema.sdl(),
            AppSchema::Products(schema) => schema.sdl(),
        }
    }
}
