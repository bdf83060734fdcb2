//! Trip search form: date-granular rules and the open-ended price ceiling.

use chrono::NaiveDate;

use crate::forms::{validate_distinct_route, validate_location, ValidationErrors, PRICE_NO_LIMIT};
use crate::models::SearchTripsData;

/// Working state of the search form. A zero price ceiling means "no
/// limit", mirroring an untouched numeric input.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub from: String,
    pub to: String,
    pub departure_date: Option<NaiveDate>,
    pub max_price: f64,
}

impl SearchForm {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(message) = validate_location("Departure location", &self.from) {
            errors.add("from", message);
        }
        if let Err(message) = validate_location("Destination", &self.to) {
            errors.add("to", message);
        }
        if errors.is_empty() {
            if let Err(message) = validate_distinct_route(&self.from, &self.to) {
                errors.add("to", message);
            }
        }

        if let Some(date) = self.departure_date {
            if date < today {
                errors.add("departure_date", "Departure date cannot be in the past");
            }
        }

        errors.finish()
    }

    /// Build the wire criteria. An absent or zero price ceiling is
    /// substituted with a large sentinel rather than rejected.
    pub fn into_criteria(self, today: NaiveDate) -> Result<SearchTripsData, ValidationErrors> {
        self.validate(today)?;

        let max_price = if self.max_price <= 0.0 {
            PRICE_NO_LIMIT
        } else {
            self.max_price
        };

        Ok(SearchTripsData {
            from: Some(self.from.trim().to_string()),
            to: Some(self.to.trim().to_string()),
            departure_date: self.departure_date,
            max_price: Some(max_price),
            limit: None,
            offset: None,
        })
    }
}
