//! Services catalog endpoints.

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthAdmin;
use crate::db::SiteDb;
use crate::error::ApiError;
use crate::models::{ApiResponse, Service, ServicePayload};

/// Active services for the public catalog.
#[openapi(tag = "Services")]
#[get("/services")]
pub async fn list_services(
    mut db: Connection<SiteDb>,
) -> Result<Json<ApiResponse<Vec<Service>>>, ApiError> {
    let services = sqlx::query_as::<_, Service>(
        "SELECT * FROM services WHERE is_active = TRUE ORDER BY created_at ASC",
    )
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(ApiResponse::data(services)))
}

/// Single service by id (public, regardless of active flag).
#[openapi(tag = "Services")]
#[get("/services/<id>")]
pub async fn get_service(
    mut db: Connection<SiteDb>,
    id: i32,
) -> Result<Json<ApiResponse<Service>>, ApiError> {
    let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".to_string()))?;

    Ok(Json(ApiResponse::data(service)))
}

/// Create a service. Admin only.
#[openapi(tag = "Services")]
#[post("/services", data = "<payload>")]
pub async fn create_service(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    payload: Json<ServicePayload>,
) -> Result<status::Created<Json<ApiResponse<Service>>>, ApiError> {
    payload.validate()?;

    let service = sqlx::query_as::<_, Service>(
        r#"
        INSERT INTO services
            (title, description, features, technologies, icon, starting_price, currency, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.features)
    .bind(&payload.technologies)
    .bind(&payload.icon)
    .bind(payload.starting_price)
    .bind(&payload.currency)
    .bind(payload.is_active)
    .fetch_one(&mut **db)
    .await?;

    let location = format!("/api/v1/services/{}", service.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::with_message(
        "Service created successfully",
        service,
    ))))
}

/// Replace a service. Admin only.
#[openapi(tag = "Services")]
#[put("/services/<id>", data = "<payload>")]
pub async fn update_service(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
    payload: Json<ServicePayload>,
) -> Result<Json<ApiResponse<Service>>, ApiError> {
    payload.validate()?;

    let service = sqlx::query_as::<_, Service>(
        r#"
        UPDATE services
        SET title = $1, description = $2, features = $3, technologies = $4, icon = $5,
            starting_price = $6, currency = $7, is_active = $8, updated_at = now()
        WHERE id = $9
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.features)
    .bind(&payload.technologies)
    .bind(&payload.icon)
    .bind(payload.starting_price)
    .bind(&payload.currency)
    .bind(payload.is_active)
    .bind(id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Service not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Service updated successfully",
        service,
    )))
}

/// Delete a service. Admin only.
#[openapi(tag = "Services")]
#[delete("/services/<id>")]
pub async fn delete_service(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
) -> Result<Json<ApiResponse<Service>>, ApiError> {
    let deleted = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(&mut **db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::NotFound("Service not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Service deleted successfully")))
}
