//! Blog / case-study endpoints. Public visitors only ever see active posts;
//! the admin listing can see and filter everything.

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthAdmin;
use crate::db::SiteDb;
use crate::error::ApiError;
use crate::models::{ApiResponse, Blog, BlogPayload};

/// Active blog posts for the public site, newest first.
#[openapi(tag = "Blog")]
#[get("/blog")]
pub async fn list_blogs(
    mut db: Connection<SiteDb>,
) -> Result<Json<ApiResponse<Vec<Blog>>>, ApiError> {
    let blogs = sqlx::query_as::<_, Blog>(
        "SELECT * FROM blogs WHERE is_active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(ApiResponse::data(blogs)))
}

/// Every blog post, optionally filtered by active flag. Admin only.
#[openapi(tag = "Blog")]
#[get("/blog/all?<isActive>")]
#[allow(non_snake_case)]
pub async fn list_all_blogs(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    isActive: Option<bool>,
) -> Result<Json<ApiResponse<Vec<Blog>>>, ApiError> {
    let blogs = match isActive {
        Some(active) => {
            sqlx::query_as::<_, Blog>(
                "SELECT * FROM blogs WHERE is_active = $1 ORDER BY created_at DESC",
            )
            .bind(active)
            .fetch_all(&mut **db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Blog>("SELECT * FROM blogs ORDER BY created_at DESC")
                .fetch_all(&mut **db)
                .await?
        }
    };

    Ok(Json(ApiResponse::data(blogs)))
}

/// Single blog post. Inactive posts are hidden from the public surface.
#[openapi(tag = "Blog")]
#[get("/blog/<id>")]
pub async fn get_blog(
    mut db: Connection<SiteDb>,
    id: i32,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **db)
        .await?
        .filter(|blog| blog.is_active)
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    Ok(Json(ApiResponse::data(blog)))
}

/// Create a blog post. Admin only.
#[openapi(tag = "Blog")]
#[post("/blog", data = "<payload>")]
pub async fn create_blog(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    payload: Json<BlogPayload>,
) -> Result<status::Created<Json<ApiResponse<Blog>>>, ApiError> {
    payload.validate()?;

    let blog = sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (title, summary, content, image, client, technologies, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.summary)
    .bind(&payload.content)
    .bind(&payload.image)
    .bind(&payload.client)
    .bind(&payload.technologies)
    .bind(payload.is_active)
    .fetch_one(&mut **db)
    .await?;

    let location = format!("/api/v1/blog/{}", blog.id);
    Ok(status::Created::new(location)
        .body(Json(ApiResponse::with_message("Blog created", blog))))
}

/// Replace a blog post. Admin only.
#[openapi(tag = "Blog")]
#[put("/blog/<id>", data = "<payload>")]
pub async fn update_blog(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
    payload: Json<BlogPayload>,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    payload.validate()?;

    let blog = sqlx::query_as::<_, Blog>(
        r#"
        UPDATE blogs
        SET title = $1, summary = $2, content = $3, image = $4, client = $5,
            technologies = $6, is_active = $7, updated_at = now()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.summary)
    .bind(&payload.content)
    .bind(&payload.image)
    .bind(&payload.client)
    .bind(&payload.technologies)
    .bind(payload.is_active)
    .bind(id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    Ok(Json(ApiResponse::with_message("Blog updated", blog)))
}

/// Delete a blog post. Admin only.
#[openapi(tag = "Blog")]
#[delete("/blog/<id>")]
pub async fn delete_blog(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    let deleted = sqlx::query("DELETE FROM blogs WHERE id = $1")
        .bind(id)
        .execute(&mut **db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::NotFound("Blog not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Blog deleted")))
}
