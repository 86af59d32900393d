use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    catalog::{
        dto::{
            CategoryPatch, CategoryPayload, Page, Pagination, ProductPatch, ProductPayload,
            ProductQuery, SubCategoryPatch, SubCategoryPayload, SubCategoryQuery,
        },
        repo_types::{Category, Product, SubCategory},
    },
    error::ApiError,
    state::AppState,
};

const MAX_PAGE_SIZE: i64 = 100;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:id", get(get_category))
        .route("/subcategories", get(list_subcategories))
        .route("/subcategories/:id", get(get_subcategory))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route(
            "/categories/:id",
            put(replace_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .route("/subcategories", post(create_subcategory))
        .route(
            "/subcategories/:id",
            put(replace_subcategory)
                .patch(patch_subcategory)
                .delete(delete_subcategory),
        )
        .route("/products", post(create_product))
        .route(
            "/products/:id",
            put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("This field may not be blank.".into()));
    }
    if name.chars().count() > 100 {
        return Err(ApiError::BadRequest(
            "Ensure this field has no more than 100 characters.".into(),
        ));
    }
    Ok(())
}

fn clamp_page(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
}

// --- categories ---

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Page<Category>>, ApiError> {
    let (limit, offset) = clamp_page(p.limit, p.offset);
    let count = Category::count(&state.db).await?;
    let results = Category::list(&state.db, limit, offset).await?;
    Ok(Json(Page::new(
        "/api/categories",
        count,
        limit,
        offset,
        None,
        results,
    )))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, ApiError> {
    let category = Category::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    validate_name(&payload.name)?;
    let category = Category::create(&state.db, payload.name.trim()).await?;
    info!(category_id = %category.id, admin = %admin.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn replace_category(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    validate_name(&payload.name)?;
    let category = Category::update(&state.db, id, Some(payload.name.trim()))
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn patch_category(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        validate_name(name)?;
    }
    let name = payload.name.as_deref().map(str::trim);
    let category = Category::update(&state.db, id, name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Category::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Not found.".into()));
    }
    info!(category_id = %id, admin = %admin.id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- subcategories ---

#[instrument(skip(state))]
pub async fn list_subcategories(
    State(state): State<AppState>,
    Query(q): Query<SubCategoryQuery>,
) -> Result<Json<Page<SubCategory>>, ApiError> {
    let (limit, offset) = clamp_page(q.limit, q.offset);
    let count = SubCategory::count(&state.db, q.category).await?;
    let results = SubCategory::list(&state.db, q.category, limit, offset).await?;
    let extra = q.category.map(|c| format!("&category={c}"));
    Ok(Json(Page::new(
        "/api/subcategories",
        count,
        limit,
        offset,
        extra.as_deref(),
        results,
    )))
}

#[instrument(skip(state))]
pub async fn get_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubCategory>, ApiError> {
    let subcategory = SubCategory::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(subcategory))
}

#[instrument(skip(state, payload))]
pub async fn create_subcategory(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<SubCategoryPayload>,
) -> Result<(StatusCode, Json<SubCategory>), ApiError> {
    validate_name(&payload.name)?;
    if Category::find(&state.db, payload.category).await?.is_none() {
        return Err(ApiError::BadRequest("Category does not exist.".into()));
    }
    let subcategory = SubCategory::create(&state.db, payload.name.trim(), payload.category).await?;
    info!(subcategory_id = %subcategory.id, admin = %admin.id, "subcategory created");
    Ok((StatusCode::CREATED, Json(subcategory)))
}

#[instrument(skip(state, payload))]
pub async fn replace_subcategory(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubCategoryPayload>,
) -> Result<Json<SubCategory>, ApiError> {
    validate_name(&payload.name)?;
    if Category::find(&state.db, payload.category).await?.is_none() {
        return Err(ApiError::BadRequest("Category does not exist.".into()));
    }
    let subcategory =
        SubCategory::update(&state.db, id, Some(payload.name.trim()), Some(payload.category))
            .await?
            .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(subcategory))
}

#[instrument(skip(state, payload))]
pub async fn patch_subcategory(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubCategoryPatch>,
) -> Result<Json<SubCategory>, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(category) = payload.category {
        if Category::find(&state.db, category).await?.is_none() {
            return Err(ApiError::BadRequest("Category does not exist.".into()));
        }
    }
    let name = payload.name.as_deref().map(str::trim);
    let subcategory = SubCategory::update(&state.db, id, name, payload.category)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(subcategory))
}

#[instrument(skip(state))]
pub async fn delete_subcategory(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !SubCategory::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Not found.".into()));
    }
    info!(subcategory_id = %id, admin = %admin.id, "subcategory deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- products ---

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<ProductQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    let (limit, offset) = clamp_page(q.limit, q.offset);
    let search = q
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let count = Product::count(&state.db, search).await?;
    let results = Product::list(&state.db, search, limit, offset).await?;
    let extra = search.map(|s| format!("&search={s}"));
    Ok(Json(Page::new(
        "/api/products",
        count,
        limit,
        offset,
        extra.as_deref(),
        results,
    )))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = Product::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(product))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_name(&payload.name)?;
    if SubCategory::find(&state.db, payload.subcategory)
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest("Subcategory does not exist.".into()));
    }
    let product = Product::create(
        &state.db,
        payload.name.trim(),
        &payload.description,
        payload.price,
        payload.quantity,
        payload.subcategory,
        payload.thumbnail.as_deref(),
        payload.additional_images,
    )
    .await?;
    info!(product_id = %product.id, admin = %admin.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, payload))]
pub async fn replace_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    validate_name(&payload.name)?;
    if SubCategory::find(&state.db, payload.subcategory)
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest("Subcategory does not exist.".into()));
    }
    let product = Product::replace(
        &state.db,
        id,
        payload.name.trim(),
        &payload.description,
        payload.price,
        payload.quantity,
        payload.subcategory,
        payload.thumbnail.as_deref(),
        payload.additional_images,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(product))
}

#[instrument(skip(state, payload))]
pub async fn patch_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(subcategory) = payload.subcategory {
        if SubCategory::find(&state.db, subcategory).await?.is_none() {
            return Err(ApiError::BadRequest("Subcategory does not exist.".into()));
        }
    }
    let name = payload.name.as_deref().map(str::trim);
    let product = Product::patch(
        &state.db,
        id,
        name,
        payload.description.as_deref(),
        payload.price,
        payload.quantity,
        payload.subcategory,
        payload.thumbnail.as_deref(),
        payload.additional_images,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Not found.".into()))?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Product::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Not found.".into()));
    }
    info!(product_id = %id, admin = %admin.id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("Kitchen").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn name_capped_at_100_chars() {
        assert!(validate_name(&"a".repeat(100)).is_ok());
        let err = validate_name(&"a".repeat(101)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Ensure this field has no more than 100 characters."
        );
    }

    #[test]
    fn page_clamping() {
        assert_eq!(clamp_page(20, 0), (20, 0));
        assert_eq!(clamp_page(0, 0), (1, 0));
        assert_eq!(clamp_page(1000, -5), (100, 0));
    }
}
