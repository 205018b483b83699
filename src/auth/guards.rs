//! Request guards implementing the token verification gate.
//!
//! Per request the flow is: bearer token present -> signature and expiry
//! valid -> embedded id resolves to a live administrator -> account active.
//! Any failed step rejects the request before the route handler runs.

use rocket::Request;
use rocket::State;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{
    Object, SecurityRequirement, SecurityScheme, SecuritySchemeData,
};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};

use crate::auth::store::Admin;
use crate::auth::{AuthError, AuthResult, AuthState};

/// Authenticated administrator, resolved from the bearer token and attached
/// to the request for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Admin);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthAdmin {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match extract_admin(request).await {
            Ok(admin) => Outcome::Success(AuthAdmin(admin)),
            Err(err) => Outcome::Error((err.status(), err)),
        }
    }
}

/// Secondary gate restricting an operation to the privileged role.
#[derive(Debug, Clone)]
pub struct RequireSuperAdmin(pub Admin);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequireSuperAdmin {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthAdmin::from_request(request).await {
            Outcome::Success(AuthAdmin(admin)) => {
                if admin.role.is_super() {
                    Outcome::Success(RequireSuperAdmin(admin))
                } else {
                    Outcome::Error((Status::Forbidden, AuthError::Forbidden))
                }
            }
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Forward(status) => Outcome::Forward(status),
        }
    }
}

async fn extract_admin(request: &Request<'_>) -> AuthResult<Admin> {
    let token = bearer_token_from_request(request)?;

    let auth_state = request
        .guard::<&State<AuthState>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("AuthState missing from managed state".into()))?;

    let claims = auth_state.jwt_service.decode_access_token(token)?;
    let admin_id: i32 = claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;

    // The token stays cryptographically valid until expiry, so deletion or
    // deactivation of the account must be re-checked on every request.
    let admin = auth_state
        .store
        .find_by_id(admin_id)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    if !admin.is_active {
        return Err(AuthError::Unauthorized);
    }

    Ok(admin)
}

fn bearer_token_from_request<'r>(request: &'r Request<'_>) -> AuthResult<&'r str> {
    let header = request
        .headers()
        .get_one("Authorization")
        .ok_or(AuthError::Unauthorized)?;
    let mut parts = header.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();
    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Ok(token)
    } else {
        Err(AuthError::Unauthorized)
    }
}

fn bearer_security_input(description: &str) -> rocket_okapi::Result<RequestHeaderInput> {
    let security_scheme = SecurityScheme {
        description: Some(description.to_owned()),
        data: SecuritySchemeData::Http {
            scheme: "bearer".to_owned(),
            bearer_format: Some("JWT".to_owned()),
        },
        extensions: Object::default(),
    };
    let mut requirement = SecurityRequirement::new();
    requirement.insert("bearerAuth".to_owned(), Vec::new());
    Ok(RequestHeaderInput::Security(
        "bearerAuth".to_owned(),
        security_scheme,
        requirement,
    ))
}

impl<'r> OpenApiFromRequest<'r> for AuthAdmin {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        bearer_security_input("Access token issued by POST /admin/login.")
    }
}

impl<'r> OpenApiFromRequest<'r> for RequireSuperAdmin {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        bearer_security_input("Access token of a super-admin account.")
    }
}
