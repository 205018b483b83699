//! HTTP handlers for the `/admin` console: login plus the token-protected
//! profile and account-management endpoints.

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;

use crate::auth::guards::{AuthAdmin, RequireSuperAdmin};
use crate::auth::responses::{
    AdminSummary, ChangePasswordRequest, CreateAdminRequest, LoginData, LoginRequest,
    ProfileUpdateRequest, Role,
};
use crate::auth::store::NewAdmin;
use crate::auth::{AuthError, AuthState};
use crate::error::ApiError;
use crate::models::ApiResponse;

const MIN_PASSWORD_LEN: usize = 6;

/// Authenticate an administrator and issue a 24h access token.
///
/// Unknown email, wrong password, and deactivated account all yield the same
/// generic 401 so the endpoint cannot be used to enumerate accounts.
#[openapi(tag = "Admin")]
#[post("/admin/login", data = "<payload>")]
pub async fn login(
    state: &State<AuthState>,
    payload: Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    // The password is compared byte-for-byte with what was hashed at
    // provisioning time; trimming here would lock out whitespace-padded
    // passwords.
    let email = payload.email.trim().to_lowercase();
    let password = payload.password.as_str();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let admin = state
        .store
        .find_by_email(&email)
        .await
        .map_err(ApiError::from)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !admin.is_active {
        return Err(AuthError::InvalidCredentials.into());
    }

    let verified = state
        .store
        .verify_password(&admin, password)
        .map_err(ApiError::from)?;
    if !verified {
        return Err(AuthError::InvalidCredentials.into());
    }

    // Best-effort audit update; a failure here must not fail the login.
    if let Err(err) = state.store.touch_last_login(admin.id).await {
        log::warn!("failed to record last login for admin {}: {}", admin.id, err);
    }

    let token = state
        .jwt_service
        .issue_access_token(admin.id, &admin.username, &admin.email, admin.role.as_str())
        .map_err(ApiError::from)?;

    log::info!("admin {} logged in", admin.username);

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        LoginData {
            admin: admin.summary(),
            token: token.token,
            expires_at: token.expires_at,
        },
    )))
}

/// Current administrator profile, resolved from the bearer token.
#[openapi(tag = "Admin")]
#[get("/admin/profile")]
pub async fn get_profile(admin: AuthAdmin) -> Json<ApiResponse<AdminSummary>> {
    Json(ApiResponse::data(admin.0.summary()))
}

/// Update the caller's display name and email.
#[openapi(tag = "Admin")]
#[put("/admin/profile", data = "<payload>")]
pub async fn update_profile(
    state: &State<AuthState>,
    admin: AuthAdmin,
    payload: Json<ProfileUpdateRequest>,
) -> Result<Json<ApiResponse<AdminSummary>>, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(ApiError::Validation(
            "Name and email are required".to_string(),
        ));
    }

    // Same taxonomy as create_admin: a taken email is a 400, not a unique
    // constraint violation bubbling up as a 500.
    let holder = state
        .store
        .find_by_email(email)
        .await
        .map_err(ApiError::from)?;
    if holder.is_some_and(|existing| existing.id != admin.0.id) {
        return Err(ApiError::Validation(
            "Email is already in use by another admin".to_string(),
        ));
    }

    let updated = state
        .store
        .update_profile(admin.0.id, name, email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        updated.summary(),
    )))
}

/// Change the caller's password after re-verifying the current one.
#[openapi(tag = "Admin")]
#[put("/admin/change-password", data = "<payload>")]
pub async fn change_password(
    state: &State<AuthState>,
    admin: AuthAdmin,
    payload: Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<AdminSummary>>, ApiError> {
    let current = payload.current_password.as_str();
    let new = payload.new_password.as_str();

    if current.is_empty() || new.is_empty() {
        return Err(ApiError::Validation(
            "Current password and new password are required".to_string(),
        ));
    }
    if new.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let verified = state
        .store
        .verify_password(&admin.0, current)
        .map_err(ApiError::from)?;
    if !verified {
        return Err(ApiError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    state
        .store
        .change_password(admin.0.id, new)
        .await
        .map_err(ApiError::from)?;

    log::info!("admin {} changed their password", admin.0.username);

    Ok(Json(ApiResponse::with_message(
        "Password changed successfully",
        admin.0.summary(),
    )))
}

/// Provision a new administrator account. Super-admin only.
#[openapi(tag = "Admin")]
#[post("/admin/create", data = "<payload>")]
pub async fn create_admin(
    state: &State<AuthState>,
    _caller: RequireSuperAdmin,
    payload: Json<CreateAdminRequest>,
) -> Result<status::Created<Json<ApiResponse<AdminSummary>>>, ApiError> {
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    if username.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username, email, and password are required".to_string(),
        ));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let existing = state
        .store
        .find_by_email_or_username(&email, &username)
        .await
        .map_err(ApiError::from)?;
    if existing.is_some() {
        return Err(ApiError::Validation(
            "Admin with this username or email already exists".to_string(),
        ));
    }

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&username)
        .to_string();

    let admin = state
        .store
        .insert(NewAdmin {
            username,
            name,
            email,
            password: payload.password.clone(),
            role: payload.role.unwrap_or(Role::Admin),
        })
        .await
        .map_err(ApiError::from)?;

    log::info!("admin account {} created", admin.username);

    let location = format!("/api/v1/admin/{}", admin.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::with_message(
        "Admin created successfully",
        admin.summary(),
    ))))
}

/// All administrator accounts, newest first. Super-admin only.
#[openapi(tag = "Admin")]
#[get("/admin/list")]
pub async fn list_admins(
    state: &State<AuthState>,
    _caller: RequireSuperAdmin,
) -> Result<Json<ApiResponse<Vec<AdminSummary>>>, ApiError> {
    let admins = state.store.list().await.map_err(ApiError::from)?;
    let summaries = admins.iter().map(|a| a.summary()).collect();
    Ok(Json(ApiResponse::data(summaries)))
}
