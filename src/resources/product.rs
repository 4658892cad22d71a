use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, SimpleObject};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::guard::RoleGuard;
use crate::error::ApiError;
use crate::resources;
use crate::users::model::Role;

const PRODUCT_COLUMNS: &str = "id, barcode, description, pricekg, produced, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub barcode: String,
    pub description: String,
    pub pricekg: String,
    pub produced: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Product")]
pub struct ProductView {
    pub id: Uuid,
    pub barcode: String,
    pub description: String,
    pub pricekg: String,
    pub produced: String,
    pub created_at: OffsetDateTime,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            barcode: product.barcode,
            description: product.description,
            pricekg: product.pricekg,
            produced: product.produced,
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct CreateProductInput {
    pub barcode: String,
    pub description: String,
    pub pricekg: String,
    pub produced: String,
}

async fn insert(db: &PgPool, data: &CreateProductInput) -> Result<Product, ApiError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (barcode, description, pricekg, produced)
        VALUES ($1, $2, $3, $4)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&data.barcode)
    .bind(&data.description)
    .bind(&data.pricekg)
    .bind(&data.produced)
    .fetch_one(db)
    .await?;
    Ok(product)
}

#[derive(Default)]
pub struct ProductQuery;

#[Object]
impl ProductQuery {
    async fn all_products(&self, ctx: &Context<'_>) -> Result<Vec<ProductView>> {
        let db = ctx.data_unchecked::<PgPool>();
        let products = resources::list_all::<Product>(
            db,
            &format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at"),
        )
        .await
        .map_err(|e| e.extend())?;
        Ok(products.into_iter().map(ProductView::from).collect())
    }
}

#[derive(Default)]
pub struct ProductMutation;

#[Object]
impl ProductMutation {
    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn create_product(&self, ctx: &Context<'_>, data: CreateProductInput) -> Result<ProductView> {
        let db = ctx.data_unchecked::<PgPool>();
        let product = insert(db, &data).await.map_err(|e| e.extend())?;
        info!(product_id = %product.id, "product created");
        Ok(ProductView::from(product))
    }

    /// Unlike the course variant, product deletion is open to any caller.
    async fn delete_product(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let db = ctx.data_unchecked::<PgPool>();
        if !resources::delete_by_id(db, "products", id)
            .await
            .map_err(|e| e.extend())?
        {
            return Err(ApiError::NotFound("product").extend());
        }
        info!(product_id = %id, "product deleted");
        Ok(true)
    }
}
