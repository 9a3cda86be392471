use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType {
    OneDay,
    Normal,
    Unset,
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::Unset
    }
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::OneDay => "one_day",
            ServiceType::Normal => "normal",
            ServiceType::Unset => "",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub service_type: ServiceType,
    pub transfer_type: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload; the store assigns id and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub service_type: ServiceType,
    pub transfer_type: String,
}
