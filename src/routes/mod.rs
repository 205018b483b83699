//! HTTP route handlers grouped by resource domain.
//!
//! Each submodule corresponds to a logical area of the site (blog, contact
//! intake, services, etc.) and exposes typed Rocket handlers annotated with
//! `#[openapi]` so `rocket_okapi` can derive an OpenAPI document
//! automatically. Admin console routes live in `crate::auth::routes`.

pub mod blog;
pub mod catchers;
pub mod contact;
pub mod health;
pub mod services;
pub mod stats;
pub mod testimonials;
