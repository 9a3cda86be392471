//! Step timing data models.
//!
//! A `StepTimingRecord` is the durable analog of one completed workflow
//! step. Records are insert-only; nothing in the app updates or deletes
//! them once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTimingRecord {
    pub id: String,
    pub customer_id: String,
    pub service_id: Option<String>,
    pub step_id: u32,
    pub step_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns id and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStepTiming {
    pub customer_id: String,
    pub service_id: Option<String>,
    pub step_id: u32,
    pub step_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,
}
