//! Wire-facing data models for the consultancy website API.
//!
//! Every response uses the [`ApiResponse`] envelope. Request payloads are
//! explicit structs with `deny_unknown_fields` so the boundary rejects shapes
//! it does not understand instead of coercing them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

// ===== Response Envelope =====

/// Uniform `{success, message?, data?}` envelope wrapping every response body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying only data.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful response carrying a message and data.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Successful response carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

// ===== Blog / Case Studies =====

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image: Option<String>,
    pub client: Option<String>,
    pub technologies: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for blog posts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlogPayload {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl BlogPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty()
            || self.summary.trim().is_empty()
            || self.content.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Title, summary, and content are required".to_string(),
            ));
        }
        Ok(())
    }
}

// ===== Contact Intake =====

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type,
)]
#[sqlx(type_name = "project_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    MobileApp,
    WebApp,
    FullStack,
    Consulting,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type,
)]
#[sqlx(type_name = "budget_range")]
pub enum BudgetRange {
    #[sqlx(rename = "5k-10k")]
    #[serde(rename = "5k-10k")]
    UpTo10k,
    #[sqlx(rename = "10k-25k")]
    #[serde(rename = "10k-25k")]
    UpTo25k,
    #[sqlx(rename = "25k-50k")]
    #[serde(rename = "25k-50k")]
    UpTo50k,
    #[sqlx(rename = "50k-100k")]
    #[serde(rename = "50k-100k")]
    UpTo100k,
    #[sqlx(rename = "100k+")]
    #[serde(rename = "100k+")]
    Over100k,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type,
)]
#[sqlx(type_name = "project_timeline")]
pub enum ProjectTimeline {
    #[sqlx(rename = "1-3 months")]
    #[serde(rename = "1-3 months")]
    OneToThreeMonths,
    #[sqlx(rename = "3-6 months")]
    #[serde(rename = "3-6 months")]
    ThreeToSixMonths,
    #[sqlx(rename = "6-12 months")]
    #[serde(rename = "6-12 months")]
    SixToTwelveMonths,
    #[sqlx(rename = "12+ months")]
    #[serde(rename = "12+ months")]
    OverTwelveMonths,
}

/// Workflow state of a contact-form submission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type,
)]
#[sqlx(type_name = "contact_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    New,
    Contacted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub project_type: ProjectType,
    pub budget: Option<BudgetRange>,
    pub timeline: Option<ProjectTimeline>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public contact-form submission payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default = "default_project_type")]
    pub project_type: ProjectType,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[serde(default)]
    pub timeline: Option<ProjectTimeline>,
    pub message: String,
}

impl ContactPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Name, email, and message are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Status transition payload for a contact record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ContactStatusUpdate {
    pub status: ContactStatus,
}

// ===== Services Catalog =====

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub icon: Option<String>,
    pub starting_price: Option<f64>,
    pub currency: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServicePayload {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub starting_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ServicePayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ApiError::Validation(
                "Title and description are required".to_string(),
            ));
        }
        Ok(())
    }
}

// ===== Site Stats (singleton) =====

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub id: i32,
    pub total_projects: i32,
    pub total_years: i32,
    pub total_mobile_apps: i32,
    pub total_web_apps: i32,
    pub email: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of the site stats used on the landing page. Served from the
/// singleton row when present, otherwise computed from live counts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_projects: i64,
    pub total_years: i64,
    pub total_mobile_apps: i64,
    pub total_web_apps: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
}

/// Partial update payload for the stats singleton.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StatsPayload {
    #[serde(default)]
    pub total_projects: Option<i32>,
    #[serde(default)]
    pub total_years: Option<i32>,
    #[serde(default)]
    pub total_mobile_apps: Option<i32>,
    #[serde(default)]
    pub total_web_apps: Option<i32>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

// ===== Testimonials =====

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i32,
    pub name: String,
    pub company: String,
    pub position: String,
    pub content: String,
    pub rating: i32,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestimonialPayload {
    pub name: String,
    pub company: String,
    pub position: String,
    pub content: String,
    pub rating: i32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl TestimonialPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty()
            || self.company.trim().is_empty()
            || self.position.trim().is_empty()
            || self.content.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Name, company, position, and content are required".to_string(),
            ));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ApiError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

fn default_project_type() -> ProjectType {
    ProjectType::Other
}
