//! Render models for the front end. Each one is a flat projection of the
//! session state; nothing here mutates.

use crate::chat::Conversation;
use crate::entity::Identity;
use crate::ride::Ride;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

impl From<&Identity> for Participant {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            avatar_url: identity.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideCard {
    pub id: String,
    pub driver: Participant,
    pub driver_rating: String,
    pub origin: String,
    pub destination: String,
    pub departure: String,
    pub seats: String,
    pub price: String,
}

impl RideCard {
    pub fn from_ride(ride: &Ride) -> Self {
        Self {
            id: ride.id.clone(),
            driver: Participant::from(&ride.driver),
            driver_rating: format!("{:.1}", ride.driver.rating),
            origin: ride.origin.clone(),
            destination: ride.destination.clone(),
            departure: departure_label(ride.departure_time),
            seats: format!(
                "{} of {} seats available",
                ride.available_seats, ride.total_seats
            ),
            price: format!("₹{}", ride.price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideList {
    pub title: &'static str,
    pub rides: Vec<RideCard>,
}

impl RideList {
    pub fn new<'a>(title: &'static str, rides: impl IntoIterator<Item = &'a Ride>) -> Self {
        Self {
            title,
            rides: rides.into_iter().map(RideCard::from_ride).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub ride_id: String,
    /// `None` when the other side cannot be resolved; the entry still renders.
    pub other: Option<Participant>,
    pub preview: String,
    pub last_message_at: Option<String>,
}

impl ConversationSummary {
    pub fn new(conversation: &Conversation, viewer_id: &str) -> Self {
        let last = conversation.last_message();
        Self {
            id: conversation.id.clone(),
            ride_id: conversation.ride_id.clone(),
            other: conversation.other_participant(viewer_id).map(Participant::from),
            preview: last
                .map(|m| m.text.clone())
                .unwrap_or_else(|| "No messages yet".to_string()),
            last_message_at: last.map(|m| clock_label(m.timestamp)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLine {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub sent_at: String,
    pub mine: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub conversation_id: String,
    pub ride_id: String,
    pub other: Option<Participant>,
    pub messages: Vec<ChatLine>,
}

impl ChatView {
    pub fn new(conversation: &Conversation, viewer_id: &str) -> Self {
        Self {
            conversation_id: conversation.id.clone(),
            ride_id: conversation.ride_id.clone(),
            other: conversation.other_participant(viewer_id).map(Participant::from),
            messages: conversation
                .messages
                .iter()
                .map(|m| ChatLine {
                    id: m.id.clone(),
                    sender_id: m.sender_id.clone(),
                    text: m.text.clone(),
                    sent_at: clock_label(m.timestamp),
                    mine: m.sender_id == viewer_id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub name: String,
    pub avatar_url: String,
    pub college_email: String,
    pub department: String,
    pub registration_number: String,
    pub rating: String,
    pub filled_stars: u8,
    pub rides_given: u32,
}

impl From<&Identity> for ProfileView {
    fn from(identity: &Identity) -> Self {
        Self {
            name: identity.name.clone(),
            avatar_url: identity.avatar_url.clone(),
            college_email: identity.college_email.clone(),
            department: identity.department.clone(),
            registration_number: identity.registration_number.clone(),
            rating: identity.rating_label(),
            filled_stars: identity.filled_stars(),
            rides_given: identity.rides_given,
        }
    }
}

/// "Oct 19 at 14:00", in the server's local time.
fn departure_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d at %H:%M").to_string()
}

fn clock_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}
