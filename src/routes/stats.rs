//! Site stats singleton backing the landing-page hero section.

use rocket::serde::json::Json;
use rocket::{get, put};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthAdmin;
use crate::db::SiteDb;
use crate::error::ApiError;
use crate::models::{ApiResponse, Stats, StatsPayload, StatsSnapshot};

/// Public stats. Falls back to live counts until an admin has saved the
/// singleton row.
#[openapi(tag = "Stats")]
#[get("/stats")]
pub async fn get_stats(
    mut db: Connection<SiteDb>,
) -> Result<Json<ApiResponse<StatsSnapshot>>, ApiError> {
    let row = sqlx::query_as::<_, Stats>("SELECT * FROM stats ORDER BY id ASC LIMIT 1")
        .fetch_optional(&mut **db)
        .await?;

    let snapshot = match row {
        Some(stats) => StatsSnapshot {
            total_projects: stats.total_projects as i64,
            total_years: stats.total_years as i64,
            total_mobile_apps: stats.total_mobile_apps as i64,
            total_web_apps: stats.total_web_apps as i64,
            email: Some(stats.email),
            contact_number: Some(stats.contact_number),
        },
        None => {
            let (total_projects, total_mobile_apps, total_web_apps): (i64, i64, i64) =
                sqlx::query_as(
                    r#"
                    SELECT
                        (SELECT COUNT(*) FROM blogs WHERE is_active = TRUE),
                        (SELECT COUNT(*) FROM services WHERE icon = 'mobile'),
                        (SELECT COUNT(*) FROM services WHERE icon = 'web')
                    "#,
                )
                .fetch_one(&mut **db)
                .await?;

            StatsSnapshot {
                total_projects,
                total_years: 8,
                total_mobile_apps,
                total_web_apps,
                email: None,
                contact_number: None,
            }
        }
    };

    Ok(Json(ApiResponse::data(snapshot)))
}

/// Partial update of the stats singleton, creating it on first use. Admin only.
#[openapi(tag = "Stats")]
#[put("/stats", data = "<payload>")]
pub async fn update_stats(
    _admin: AuthAdmin,
    mut db: Connection<SiteDb>,
    payload: Json<StatsPayload>,
) -> Result<Json<ApiResponse<Stats>>, ApiError> {
    let existing = sqlx::query_as::<_, Stats>("SELECT * FROM stats ORDER BY id ASC LIMIT 1")
        .fetch_optional(&mut **db)
        .await?;

    let stats = match existing {
        Some(current) => {
            sqlx::query_as::<_, Stats>(
                r#"
                UPDATE stats
                SET total_projects = $1, total_years = $2, total_mobile_apps = $3,
                    total_web_apps = $4, email = $5, contact_number = $6, updated_at = now()
                WHERE id = $7
                RETURNING *
                "#,
            )
            .bind(payload.total_projects.unwrap_or(current.total_projects))
            .bind(payload.total_years.unwrap_or(current.total_years))
            .bind(payload.total_mobile_apps.unwrap_or(current.total_mobile_apps))
            .bind(payload.total_web_apps.unwrap_or(current.total_web_apps))
            .bind(payload.email.as_deref().unwrap_or(&current.email))
            .bind(
                payload
                    .contact_number
                    .as_deref()
                    .unwrap_or(&current.contact_number),
            )
            .bind(current.id)
            .fetch_one(&mut **db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Stats>(
                r#"
                INSERT INTO stats
                    (total_projects, total_years, total_mobile_apps, total_web_apps, email, contact_number)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(payload.total_projects.unwrap_or(0))
            .bind(payload.total_years.unwrap_or(8))
            .bind(payload.total_mobile_apps.unwrap_or(0))
            .bind(payload.total_web_apps.unwrap_or(0))
            .bind(payload.email.as_deref().unwrap_or(""))
            .bind(payload.contact_number.as_deref().unwrap_or(""))
            .fetch_one(&mut **db)
            .await?
        }
    };

    Ok(Json(ApiResponse::with_message("Stats updated", stats)))
}
