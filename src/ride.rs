use crate::entity::Identity;
use crate::error::AppError;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const MAX_SEATS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub driver: Identity,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub available_seats: u32,
    pub total_seats: u32,
    pub price: u32,
    pub passengers: Vec<Identity>,
}

impl Ride {
    /// Driver or confirmed passenger.
    pub fn has_member(&self, identity_id: &str) -> bool {
        self.driver.id == identity_id || self.passengers.iter().any(|p| p.id == identity_id)
    }

    pub fn seats_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.total_seats >= 1
            && self.available_seats <= self.total_seats
            && !self.passengers.iter().any(|p| p.id == self.driver.id)
            && self.passengers.iter().all(|p| seen.insert(p.id.as_str()))
    }
}

/// Everything the offer form supplies; the id, driver and passengers are
/// filled in by the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RideDetails {
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub total_seats: u32,
    pub price: u32,
}

/// Raw offer form as submitted by the front end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferForm {
    pub origin: String,
    pub destination: String,
    /// `YYYY-MM-DD`
    pub departure_date: String,
    /// `HH:MM`
    pub departure_time: String,
    pub total_seats: u32,
    pub price: u32,
}

impl OfferForm {
    pub fn into_details(self) -> Result<RideDetails, AppError> {
        let origin = self.origin.trim();
        let destination = self.destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(AppError::Validation(
                "Origin and destination are required".to_string(),
            ));
        }
        if !(1..=MAX_SEATS).contains(&self.total_seats) {
            return Err(AppError::Validation(format!(
                "Seats must be between 1 and {}",
                MAX_SEATS
            )));
        }

        let departure_time = departure_from_form(&self.departure_date, &self.departure_time)?;

        Ok(RideDetails {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time,
            total_seats: self.total_seats,
            price: self.price,
        })
    }
}

/// Combines the form's date and time fields into one instant, read in the
/// server's local time zone.
pub fn departure_from_form(date: &str, time: &str) -> Result<DateTime<Utc>, AppError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid departure date: {}", date)))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid departure time: {}", time)))?;

    date.and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| AppError::Validation("Departure falls in a skipped local hour".to_string()))
}

/// All ride offers, most recent first.
///
/// Cloning is cheap and yields a snapshot: mutations go through
/// `Arc::make_mut`, so earlier clones keep observing the collection as it was.
#[derive(Debug, Clone, Default)]
pub struct RideCollection {
    rides: Arc<Vec<Ride>>,
}

impl RideCollection {
    pub fn new(rides: Vec<Ride>) -> Self {
        Self {
            rides: Arc::new(rides),
        }
    }

    pub fn offer_ride(&mut self, details: RideDetails, driver: Identity) -> Ride {
        let ride = Ride {
            id: format!("r-{}", Uuid::new_v4().simple()),
            driver,
            origin: details.origin,
            destination: details.destination,
            departure_time: details.departure_time,
            available_seats: details.total_seats,
            total_seats: details.total_seats,
            price: details.price,
            passengers: Vec::new(),
        };

        info!(
            ride_id = %ride.id,
            driver = %ride.driver,
            origin = %ride.origin,
            destination = %ride.destination,
            seats = ride.total_seats,
            "Ride offered"
        );

        debug_assert!(ride.seats_consistent());
        Arc::make_mut(&mut self.rides).insert(0, ride.clone());
        ride
    }

    pub fn get(&self, ride_id: &str) -> Option<&Ride> {
        self.rides.iter().find(|r| r.id == ride_id)
    }

    pub fn all(&self) -> &[Ride] {
        &self.rides
    }

    /// Rides `identity_id` drives or rides in. Recomputed on every call.
    pub fn rides_for<'a>(&'a self, identity_id: &'a str) -> impl Iterator<Item = &'a Ride> + 'a {
        self.rides.iter().filter(move |r| r.has_member(identity_id))
    }

    /// The collection as it is now; later offers do not show up in it.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }
}
