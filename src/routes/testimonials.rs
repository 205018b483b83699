//! Testimonial endpoints.

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthAdmin;
use crate::db::SiteDb;
use crate::error::ApiError;
use crate::models::{ApiResponse, Testimonial, TestimonialPayload};

/// Active testimonials for the public site, newest first.
#[openapi(tag = "Testimonials")]
#[get("/testimonials")]
pub async fn list_testimonials(
    mut db: Connection<SiteDb>,
) -> Result<Json<ApiResponse<Vec<Testimonial>>>, ApiError> {
    let testimonials = sqlx::query_as::<_, Testimonial>(
        "SELECT * FROM testimonials WHERE is_active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(ApiResponse::data(testimonials)))
}

/// Every testimonial, including inactive ones. Admin only.
#[openapi(tag = "Testimonials")]
#[get("/testimonials/all")]
pub async fn list_all_testimonials(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
) -> Result<Json<ApiResponse<Vec<Testimonial>>>, ApiError> {
    let testimonials =
        sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials ORDER BY created_at DESC")
            .fetch_all(&mut **db)
            .await?;

    Ok(Json(ApiResponse::data(testimonials)))
}

/// Create a testimonial. Admin only.
#[openapi(tag = "Testimonials")]
#[post("/testimonials", data = "<payload>")]
pub async fn create_testimonial(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    payload: Json<TestimonialPayload>,
) -> Result<status::Created<Json<ApiResponse<Testimonial>>>, ApiError> {
    payload.validate()?;

    let testimonial = sqlx::query_as::<_, Testimonial>(
        r#"
        INSERT INTO testimonials (name, company, position, content, rating, image, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.company)
    .bind(&payload.position)
    .bind(&payload.content)
    .bind(payload.rating)
    .bind(&payload.image)
    .bind(payload.is_active)
    .fetch_one(&mut **db)
    .await?;

    let location = format!("/api/v1/testimonials/{}", testimonial.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::with_message(
        "Testimonial created successfully",
        testimonial,
    ))))
}

/// Replace a testimonial. Admin only.
#[openapi(tag = "Testimonials")]
#[put("/testimonials/<id>", data = "<payload>")]
pub async fn update_testimonial(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
    payload: Json<TestimonialPayload>,
) -> Result<Json<ApiResponse<Testimonial>>, ApiError> {
    payload.validate()?;

    let testimonial = sqlx::query_as::<_, Testimonial>(
        r#"
        UPDATE testimonials
        SET name = $1, company = $2, position = $3, content = $4, rating = $5,
            image = $6, is_active = $7, updated_at = now()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.company)
    .bind(&payload.position)
    .bind(&payload.content)
    .bind(payload.rating)
    .bind(&payload.image)
    .bind(payload.is_active)
    .bind(id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Testimonial not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Testimonial updated successfully",
        testimonial,
    )))
}

/// Delete a testimonial. Admin only.
#[openapi(tag = "Testimonials")]
#[delete("/testimonials/<id>")]
pub async fn delete_testimonial(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
) -> Result<Json<ApiResponse<Testimonial>>, ApiError> {
    let deleted = sqlx::query("DELETE FROM testimonials WHERE id = $1")
        .bind(id)
        .execute(&mut **db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::NotFound("Testimonial not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Testimonial deleted successfully")))
}
