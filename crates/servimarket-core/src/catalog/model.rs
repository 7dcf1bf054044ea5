//! Catalog domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single bookable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in euros
    pub price: f64,
    pub duration_minutes: u32,
    pub category_id: String,
}

/// A group of related services (plumbing, electrical, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub id: String,
    pub name: String,
    /// Emoji shown on the category tile
    pub icon: String,
    pub description: String,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time, `HH:MM`
    pub open: String,
    /// Closing time, `HH:MM`
    pub close: String,
    pub available: bool,
}

impl DayHours {
    pub fn open(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            available: true,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: "00:00".to_string(),
            close: "00:00".to_string(),
            available: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl WorkingHours {
    /// Same hours Monday to Friday, separate Saturday hours, closed Sunday.
    pub fn weekdays_and_saturday(weekday: DayHours, saturday: DayHours) -> Self {
        Self {
            monday: weekday.clone(),
            tuesday: weekday.clone(),
            wednesday: weekday.clone(),
            thursday: weekday.clone(),
            friday: weekday,
            saturday,
            sunday: DayHours::closed(),
        }
    }

    /// Days in week order, paired with their lowercase names.
    pub fn days(&self) -> [(&'static str, &DayHours); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }
}

/// A service provider's public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    /// Owner's name
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub description: String,
    pub address: String,
    /// Categories this business serves
    pub category_ids: Vec<String>,
    pub working_hours: WorkingHours,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

/// Fulfillment progress of a hired service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiredServiceStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl HiredServiceStatus {
    /// Display text shown in the app.
    pub fn label(&self) -> &'static str {
        match self {
            HiredServiceStatus::Pending => "Pendiente",
            HiredServiceStatus::Confirmed => "Confirmado",
            HiredServiceStatus::InProgress => "En progreso",
            HiredServiceStatus::Completed => "Completado",
            HiredServiceStatus::Cancelled => "Cancelado",
        }
    }

    /// Still awaiting fulfillment (neither completed nor cancelled).
    pub fn is_open(&self) -> bool {
        !matches!(
            self,
            HiredServiceStatus::Completed | HiredServiceStatus::Cancelled
        )
    }
}

impl fmt::Display for HiredServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A service a client has booked with a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiredService {
    pub id: String,
    pub client_id: String,
    pub business_id: String,
    pub service_id: String,
    pub status: HiredServiceStatus,
    pub scheduled_date: NaiveDateTime,
    pub address: String,
    pub description: String,
    pub price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Client feedback, set once the service is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

impl HiredService {
    pub fn has_feedback(&self) -> bool {
        self.rating.is_some()
    }
}
