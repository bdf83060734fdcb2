//! Aggregate computations over trip collections.
//!
//! Pure functions with no side effects. An absent collection never reaches
//! this module: the API layer normalizes `null` list bodies to empty
//! vectors, so every function here takes a plain slice and an empty slice
//! yields zeros across the board.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Trip, TripStatus};

/// Dashboard window for the upcoming-trip count.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Sum of per-trip money-saved estimates across a collection.
pub fn total_savings(trips: &[Trip]) -> f64 {
    trips.iter().map(Trip::money_saved).sum()
}

/// Number of riders beyond the first occupant, summed over the collection.
pub fn passengers_helped(trips: &[Trip]) -> u32 {
    trips
        .iter()
        .map(|t| t.current_passengers.saturating_sub(1))
        .sum()
}

/// Active trips departing within the closed interval `[now, now + window]`.
pub fn upcoming_within(trips: &[Trip], now: DateTime<Utc>, window: Duration) -> usize {
    let limit = now + window;
    trips
        .iter()
        .filter(|t| {
            t.status == TripStatus::Active && t.departure_time >= now && t.departure_time <= limit
        })
        .count()
}

/// Partition by exact status, or pass everything through for `None`.
pub fn filter_by_status(trips: &[Trip], status: Option<TripStatus>) -> Vec<&Trip> {
    match status {
        Some(wanted) => trips.iter().filter(|t| t.status == wanted).collect(),
        None => trips.iter().collect(),
    }
}

/// The dashboard stat row: lifecycle counts plus the sharing aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_trips: usize,
    pub active_trips: usize,
    pub completed_trips: usize,
    pub cancelled_trips: usize,
    pub money_saved: f64,
    pub passengers_helped: u32,
    pub upcoming_week: usize,
}

impl DashboardStats {
    pub fn compute(trips: &[Trip], now: DateTime<Utc>) -> Self {
        let count = |status| trips.iter().filter(|t| t.status == status).count();

        Self {
            total_trips: trips.len(),
            active_trips: count(TripStatus::Active),
            completed_trips: count(TripStatus::Completed),
            cancelled_trips: count(TripStatus::Cancelled),
            money_saved: total_savings(trips),
            passengers_helped: passengers_helped(trips),
            upcoming_week: upcoming_within(trips, now, Duration::days(UPCOMING_WINDOW_DAYS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::test_support::sample_trip;

    #[test]
    fn test_passengers_helped() {
        assert_eq!(passengers_helped(&[]), 0);

        let mut solo = sample_trip(1, 10);
        solo.current_passengers = 1;
        let mut shared = sample_trip(2, 10);
        shared.current_passengers = 3;

        assert_eq!(passengers_helped(&[solo, shared]), 2);
    }

    #[test]
    fn test_passengers_helped_empty_seat() {
        let mut empty = sample_trip(1, 10);
        empty.current_passengers = 0;
        assert_eq!(passengers_helped(&[empty]), 0);
    }

    #[test]
    fn test_total_savings() {
        let mut a = sample_trip(1, 10);
        a.price_per_person = 100.0;
        a.current_passengers = 4; // saves 75
        let mut b = sample_trip(2, 10);
        b.price_per_person = 100.0;
        b.current_passengers = 1; // saves 0

        assert_eq!(total_savings(&[a, b]), 75.0);
        assert_eq!(total_savings(&[]), 0.0);
    }

    #[test]
    fn test_upcoming_window_boundaries() {
        let now = Utc::now();
        let window = Duration::days(UPCOMING_WINDOW_DAYS);

        let mut at_boundary = sample_trip(1, 10);
        at_boundary.departure_time = now + window;

        let mut past_boundary = sample_trip(2, 10);
        past_boundary.departure_time = now + window + Duration::seconds(1);

        let mut at_now = sample_trip(3, 10);
        at_now.departure_time = now;

        let trips = vec![at_boundary, past_boundary, at_now];
        assert_eq!(upcoming_within(&trips, now, window), 2);
    }

    #[test]
    fn test_upcoming_excludes_non_active() {
        let now = Utc::now();
        let mut trip = sample_trip(1, 10);
        trip.departure_time = now + Duration::days(1);
        trip.status = TripStatus::Completed;

        assert_eq!(upcoming_within(&[trip], now, Duration::days(UPCOMING_WINDOW_DAYS)), 0);
    }

    #[test]
    fn test_filter_by_status() {
        let mut active = sample_trip(1, 10);
        active.status = TripStatus::Active;
        let mut done = sample_trip(2, 10);
        done.status = TripStatus::Completed;

        let trips = vec![active, done];
        assert_eq!(filter_by_status(&trips, Some(TripStatus::Active)).len(), 1);
        assert_eq!(filter_by_status(&trips, Some(TripStatus::Cancelled)).len(), 0);
        assert_eq!(filter_by_status(&trips, None).len(), 2);
    }

    #[test]
    fn test_dashboard_stats_empty() {
        assert_eq!(DashboardStats::compute(&[], Utc::now()), DashboardStats::default());
    }

    #[test]
    fn test_dashboard_stats() {
        let now = Utc::now();

        let mut a = sample_trip(1, 10);
        a.status = TripStatus::Active;
        a.departure_time = now + Duration::days(2);
        a.price_per_person = 200.0;
        a.current_passengers = 2; // saves 100, helps 1

        let mut b = sample_trip(2, 10);
        b.status = TripStatus::Completed;
        b.current_passengers = 4; // helps 3

        let mut c = sample_trip(3, 10);
        c.status = TripStatus::Cancelled;
        c.current_passengers = 1;

        let stats = DashboardStats::compute(&[a, b, c], now);
        assert_eq!(stats.total_trips, 3);
        assert_eq!(stats.active_trips, 1);
        assert_eq!(stats.completed_trips, 1);
        assert_eq!(stats.cancelled_trips, 1);
        assert_eq!(stats.money_saved, 100.0);
        assert_eq!(stats.passengers_helped, 4);
        assert_eq!(stats.upcoming_week, 1);
    }
}
