//! Trip models and per-trip derived values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Lifecycle status of a trip.
///
/// Active trips may move to completed or cancelled; the client never
/// re-activates a terminal trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown trip status: {}", s)),
        }
    }
}

/// The viewer's relationship to a trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripRole {
    Driver,
    Passenger,
    None,
}

/// A journey offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    pub driver_id: i64,
    pub from: String,
    pub to: String,
    pub departure_time: DateTime<Utc>,
    pub max_passengers: u32,
    pub current_passengers: u32,
    pub price_per_person: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Embedded driver record, when the backend expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<User>,
    /// Embedded passenger list; absent on the wire means empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passengers: Vec<User>,
    /// Viewer-relative role tag, when the backend resolves it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<TripRole>,
}

impl Trip {
    /// Seats still open on this trip. Never negative: the passenger count
    /// invariant is `current <= max`, and a server that briefly violates it
    /// must not make the client panic or report negative seats.
    pub fn available_seats(&self) -> u32 {
        self.max_passengers.saturating_sub(self.current_passengers)
    }

    pub fn is_full(&self) -> bool {
        self.current_passengers >= self.max_passengers
    }

    /// Classify the viewer's role: owner id match or an explicit tag makes
    /// them the driver, an explicit tag makes them a passenger, anything
    /// else is none.
    pub fn role_for(&self, viewer: Option<&User>) -> TripRole {
        if let Some(user) = viewer {
            if user.id == self.driver_id {
                return TripRole::Driver;
            }
        }
        match self.user_role {
            Some(TripRole::Driver) => TripRole::Driver,
            Some(TripRole::Passenger) => TripRole::Passenger,
            _ => TripRole::None,
        }
    }

    /// Whether the viewer may join: only non-members, and only while a seat
    /// is open. Drivers never join their own trip; passengers never join
    /// twice.
    pub fn can_join(&self, viewer: Option<&User>) -> bool {
        self.role_for(viewer) == TripRole::None && !self.is_full()
    }

    /// Estimated money saved by cost-splitting on this trip: the fraction
    /// of the per-person fare attributable to riders beyond the first.
    /// Zero until at least two people share the ride.
    pub fn money_saved(&self) -> f64 {
        if self.current_passengers > 1 {
            let n = self.current_passengers as f64;
            self.price_per_person * (n - 1.0) / n
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripData {
    pub from: String,
    pub to: String,
    pub departure_time: DateTime<Utc>,
    pub max_passengers: u32,
    pub price_per_person: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial trip update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passengers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_person: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Search criteria; the departure date is date-granular.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTripsData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}
