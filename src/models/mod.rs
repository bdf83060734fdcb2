//! Wire-format models for the RidePool API.

pub mod trip;
pub mod user;

pub use trip::{CreateTripData, SearchTripsData, Trip, TripRole, TripStatus, UpdateTripData};
pub use user::{
    AuthPayload, LoginRequest, MessageResponse, RegisterData, UpdateProfileData, User,
};
