// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Supplier {
    #[schema(example = 1)]
    pub id: i32,

    #[serde(rename = "nombre")]
    #[schema(example = "Pet Supplies SA")]
    pub name: String,

    #[serde(rename = "creadoEn")]
    pub created_at: DateTime<Utc>,
}
