//! Contact-form intake and the admin triage surface.

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{get, patch, post};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthAdmin;
use crate::db::SiteDb;
use crate::error::ApiError;
use crate::models::{ApiResponse, Contact, ContactPayload, ContactStatusUpdate};

/// Public contact-form submission.
#[openapi(tag = "Contact")]
#[post("/contact", data = "<payload>")]
pub async fn submit_contact(
    mut db: Connection<SiteDb>,
    payload: Json<ContactPayload>,
) -> Result<status::Created<Json<ApiResponse<Contact>>>, ApiError> {
    payload.validate()?;

    let contact = sqlx::query_as::<_, Contact>(
        r#"
        INSERT INTO contacts (name, email, phone, company, project_type, budget, timeline, message)
        VALUES ($1, lower($2), $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(&payload.phone)
    .bind(&payload.company)
    .bind(payload.project_type)
    .bind(payload.budget)
    .bind(payload.timeline)
    .bind(payload.message.trim())
    .fetch_one(&mut **db)
    .await?;

    log::info!("contact form submitted by {}", contact.email);

    let location = format!("/api/v1/contact/{}", contact.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::with_message(
        "Contact form submitted successfully",
        contact,
    ))))
}

/// All contact submissions, newest first. Admin only.
#[openapi(tag = "Contact")]
#[get("/contact")]
pub async fn list_contacts(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
) -> Result<Json<ApiResponse<Vec<Contact>>>, ApiError> {
    let contacts =
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts ORDER BY created_at DESC")
            .fetch_all(&mut **db)
            .await?;

    Ok(Json(ApiResponse::data(contacts)))
}

/// Move a contact submission through the triage workflow. Admin only.
#[openapi(tag = "Contact")]
#[patch("/contact/<id>/status", data = "<payload>")]
pub async fn update_contact_status(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    id: i32,
    payload: Json<ContactStatusUpdate>,
) -> Result<Json<ApiResponse<Contact>>, ApiError> {
    let contact = sqlx::query_as::<_, Contact>(
        "UPDATE contacts SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(payload.status)
    .bind(id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))?;

    Ok(Json(ApiResponse::data(contact)))
}
