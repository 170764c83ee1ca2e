use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::errors::AppError;

/// Status given to a lead when the submission does not carry one.
pub const DEFAULT_LEAD_STATUS: &str = "new";

// ============ Catalog Records ============

/// LED screen model shown in the catalog.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    /// Unique, URL-friendly identifier.
    pub slug: String,
    pub name: String,
    /// Screen type, e.g. "indoor" or "outdoor".
    #[serde(rename = "type")]
    pub screen_type: String,
    /// Purpose tags, in display order.
    pub purpose: Vec<String>,
    pub pixel_pitch: String,
    /// Brightness in nits.
    pub brightness: i32,
    /// Refresh rate in Hz.
    pub refresh_rate: i32,
    /// Ingress protection rating, e.g. "IP65".
    pub ip_rating: String,
    pub viewing_distance_min: i32,
    pub viewing_distance_max: i32,
    pub price_from: Option<f64>,
    pub short_description: String,
    pub full_description: String,
    pub images: Vec<String>,
    /// Warranty in months.
    pub warranty: i32,
    /// Lead time in days.
    pub lead_time: i32,
    pub is_featured: bool,
    pub sort_order: i32,
}

/// Ready-made screen configuration with fixed dimensions.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub screen_type: String,
    /// Width in meters.
    pub width: f64,
    /// Height in meters.
    pub height: f64,
    /// Always `width * height`.
    pub area: f64,
    pub pixel_pitch: String,
    pub brightness: i32,
    /// Items included in the package, in display order.
    pub included: Vec<String>,
    pub price_from: f64,
    pub warranty: i32,
    pub lead_time: i32,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub featured_order: i32,
}

/// Case study of a completed installation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub city: String,
    pub industry: String,
    pub task: String,
    /// Description of the delivered solution.
    pub solution: String,
    pub specs: Vec<String>,
    /// Installation duration in days.
    pub duration: i32,
    pub result: String,
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub testimonial: Option<String>,
    pub is_featured: bool,
    pub featured_order: i32,
}

// ============ Catalog Submissions ============

/// Body of `POST /api/products`. Without `id` a new row is inserted,
/// with `id` the existing row is replaced in full.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub screen_type: String,
    #[serde(default)]
    pub purpose: Vec<String>,
    #[serde(default)]
    pub pixel_pitch: String,
    #[serde(default)]
    pub brightness: i32,
    #[serde(default)]
    pub refresh_rate: i32,
    #[serde(default)]
    pub ip_rating: String,
    #[serde(default)]
    pub viewing_distance_min: i32,
    #[serde(default)]
    pub viewing_distance_max: i32,
    #[serde(default)]
    pub price_from: Option<f64>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub warranty: i32,
    #[serde(default)]
    pub lead_time: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_blank("slug", &self.slug)?;
        require_non_blank("name", &self.name)
    }

    pub fn into_record(self, id: i64) -> Product {
        Product {
            id,
            slug: self.slug,
            name: self.name,
            screen_type: self.screen_type,
            purpose: self.purpose,
            pixel_pitch: self.pixel_pitch,
            brightness: self.brightness,
            refresh_rate: self.refresh_rate,
            ip_rating: self.ip_rating,
            viewing_distance_min: self.viewing_distance_min,
            viewing_distance_max: self.viewing_distance_max,
            price_from: self.price_from,
            short_description: self.short_description,
            full_description: self.full_description,
            images: self.images,
            warranty: self.warranty,
            lead_time: self.lead_time,
            is_featured: self.is_featured,
            sort_order: self.sort_order,
        }
    }
}

/// Body of `POST /api/solutions`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolutionInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub screen_type: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Ignored on input, recomputed from the dimensions.
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub pixel_pitch: String,
    #[serde(default)]
    pub brightness: i32,
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub price_from: f64,
    #[serde(default)]
    pub warranty: i32,
    #[serde(default)]
    pub lead_time: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_order: i32,
}

impl SolutionInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_blank("slug", &self.slug)?;
        require_non_blank("name", &self.name)?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(AppError::BadRequest(
                "width and height cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_derived_area(mut self) -> Self {
        self.area = self.width * self.height;
        self
    }

    pub fn into_record(self, id: i64) -> Solution {
        Solution {
            id,
            slug: self.slug,
            name: self.name,
            screen_type: self.screen_type,
            width: self.width,
            height: self.height,
            area: self.area,
            pixel_pitch: self.pixel_pitch,
            brightness: self.brightness,
            included: self.included,
            price_from: self.price_from,
            warranty: self.warranty,
            lead_time: self.lead_time,
            images: self.images,
            is_featured: self.is_featured,
            featured_order: self.featured_order,
        }
    }
}

/// Body of `POST /api/cases`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub specs: Vec<String>,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub testimonial: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_order: i32,
}

impl CaseInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_blank("slug", &self.slug)?;
        require_non_blank("title", &self.title)
    }

    pub fn into_record(self, id: i64) -> Case {
        Case {
            id,
            slug: self.slug,
            title: self.title,
            city: self.city,
            industry: self.industry,
            task: self.task,
            solution: self.solution,
            specs: self.specs,
            duration: self.duration,
            result: self.result,
            images: self.images,
            video_url: self.video_url,
            testimonial: self.testimonial,
            is_featured: self.is_featured,
            featured_order: self.featured_order,
        }
    }
}

// ============ Leads ============

/// Contact request captured by the site's lead form.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub message: String,
    /// Page the form was submitted from.
    pub page_url: String,
    /// Which form on the site produced the lead, e.g. "general".
    pub source: String,
    pub product_id: Option<String>,
    pub solution_id: Option<String>,
    /// Workflow status, e.g. "new", "in_progress", "done".
    pub status: String,
    pub manager_note: String,
}

/// Body of `POST /api/leads`.
///
/// Has no `id` or `createdAt`: whatever the client sends for those is dropped
/// during decoding and the store assigns both.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub solution_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl NewLead {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("phone", &self.phone)
    }

    pub fn status(&self) -> &str {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LEAD_STATUS)
    }

    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> Lead {
        let status = self.status().to_string();
        Lead {
            id,
            created_at,
            name: self.name,
            phone: self.phone,
            city: self.city,
            message: self.message,
            page_url: self.page_url,
            source: self.source,
            product_id: self.product_id,
            solution_id: self.solution_id,
            status,
            manager_note: String::new(),
        }
    }
}

/// Body of `PATCH /api/leads/{id}`: only the fields a manager may change.
/// Keys other than these are rejected.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LeadUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub manager_note: Option<String>,
}

impl LeadUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.manager_note.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::BadRequest(
                "Update must contain status or managerNote".to_string(),
            ));
        }
        if let Some(status) = &self.status {
            require_non_blank("status", status)?;
        }
        Ok(())
    }

    /// Applies the supplied fields, leaving the rest untouched.
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(status) = &self.status {
            lead.status = status.clone();
        }
        if let Some(note) = &self.manager_note {
            lead.manager_note = note.clone();
        }
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}
