//! Trip creation form: per-field rules, touched tracking, submit gate.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::forms::{
    validate_distinct_route, validate_location, ValidationErrors, MAX_DESCRIPTION_LEN,
    MAX_PASSENGERS, MAX_PRICE, MIN_LEAD_TIME_MINUTES, MIN_PASSENGERS,
};
use crate::models::CreateTripData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripField {
    From,
    To,
    DepartureTime,
    MaxPassengers,
    PricePerPerson,
    Description,
}

impl TripField {
    pub const ALL: [TripField; 6] = [
        TripField::From,
        TripField::To,
        TripField::DepartureTime,
        TripField::MaxPassengers,
        TripField::PricePerPerson,
        TripField::Description,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TripField::From => "from",
            TripField::To => "to",
            TripField::DepartureTime => "departure_time",
            TripField::MaxPassengers => "max_passengers",
            TripField::PricePerPerson => "price_per_person",
            TripField::Description => "description",
        }
    }
}

/// Working state of the trip creation form.
///
/// Field values are public and edited directly; the form only reports an
/// error for a field once it has been touched (blurred), and `validate_all`
/// touches everything for the submit path.
#[derive(Debug, Clone)]
pub struct TripForm {
    pub from: String,
    pub to: String,
    pub departure_time: Option<DateTime<Utc>>,
    pub max_passengers: u32,
    pub price_per_person: f64,
    pub description: String,
    pub(crate) touched: HashSet<TripField>,
    pub(crate) errors: ValidationErrors,
}

impl Default for TripForm {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            departure_time: None,
            max_passengers: MIN_PASSENGERS,
            price_per_person: 0.0,
            description: String::new(),
            touched: HashSet::new(),
            errors: ValidationErrors::new(),
        }
    }
}

impl TripForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate one field against the current values. Pure; does not
    /// change touched state.
    pub fn check_field(&self, field: TripField, now: DateTime<Utc>) -> Result<(), String> {
        match field {
            TripField::From => validate_location("Departure location", &self.from),
            TripField::To => {
                validate_location("Destination", &self.to)?;
                validate_distinct_route(&self.from, &self.to)
            }
            TripField::DepartureTime => match self.departure_time {
                None => Err("Departure time is required".to_string()),
                Some(departure) => {
                    if departure <= now {
                        return Err("Departure time must be in the future".to_string());
                    }
                    if departure < now + Duration::minutes(MIN_LEAD_TIME_MINUTES) {
                        return Err(format!(
                            "Departure time must be at least {} minutes from now",
                            MIN_LEAD_TIME_MINUTES
                        ));
                    }
                    Ok(())
                }
            },
            TripField::MaxPassengers => {
                if self.max_passengers < MIN_PASSENGERS {
                    return Err(format!(
                        "At least {} passenger is required",
                        MIN_PASSENGERS
                    ));
                }
                if self.max_passengers > MAX_PASSENGERS {
                    return Err(format!("Maximum {} passengers allowed", MAX_PASSENGERS));
                }
                Ok(())
            }
            TripField::PricePerPerson => {
                if self.price_per_person <= 0.0 {
                    return Err("Price must be greater than 0".to_string());
                }
                if self.price_per_person > MAX_PRICE {
                    return Err("Price seems too high. Please check.".to_string());
                }
                Ok(())
            }
            TripField::Description => {
                if self.description.chars().count() > MAX_DESCRIPTION_LEN {
                    return Err(format!(
                        "Description is too long (max {} characters)",
                        MAX_DESCRIPTION_LEN
                    ));
                }
                Ok(())
            }
        }
    }

    /// Mark a field visited and validate it.
    pub fn blur(&mut self, field: TripField, now: DateTime<Utc>) {
        self.touched.insert(field);
        self.refresh(field, now);
    }

    /// React to an edit: clear the field's stale error, then revalidate
    /// only if the field has been touched before.
    pub fn edited(&mut self, field: TripField, now: DateTime<Utc>) {
        self.errors.remove(field.name());
        if self.touched.contains(&field) {
            self.refresh(field, now);
        }
    }

    fn refresh(&mut self, field: TripField, now: DateTime<Utc>) {
        match self.check_field(field, now) {
            Ok(()) => self.errors.remove(field.name()),
            Err(message) => self.errors.add(field.name(), message),
        }
    }

    pub fn error(&self, field: TripField) -> Option<&str> {
        self.errors.get(field.name())
    }

    /// Submit mode: touch and validate every field. Returns true when the
    /// form is clean.
    pub fn validate_all(&mut self, now: DateTime<Utc>) -> bool {
        for field in TripField::ALL {
            self.touched.insert(field);
            self.refresh(field, now);
        }
        self.errors.is_empty()
    }

    /// Gate to the wire payload; any validation error blocks submission.
    pub fn into_payload(mut self, now: DateTime<Utc>) -> Result<CreateTripData, ValidationErrors> {
        if !self.validate_all(now) {
            return Err(self.errors);
        }
        let Some(departure_time) = self.departure_time else {
            return Err(self.errors);
        };

        let description = self.description.trim();
        Ok(CreateTripData {
            from: self.from.trim().to_string(),
            to: self.to.trim().to_string(),
            departure_time,
            max_passengers: self.max_passengers,
            price_per_person: self.price_per_person,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
        })
    }
}
