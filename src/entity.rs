use serde::{Deserialize, Serialize};
use std::fmt;

/// A community member: either pre-seeded or created at login for the
/// lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub college_email: String,
    pub registration_number: String,
    pub department: String,
    /// Always within `0.0..=5.0`.
    pub rating: f32,
    pub rides_given: u32,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        college_email: impl Into<String>,
        registration_number: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            avatar_url: avatar_url_for(&name),
            name,
            college_email: college_email.into(),
            registration_number: registration_number.into(),
            department: department.into(),
            rating: 0.0,
            rides_given: 0,
        }
    }

    pub fn with_reputation(mut self, rating: f32, rides_given: u32) -> Self {
        self.rating = rating.clamp(0.0, 5.0);
        self.rides_given = rides_given;
        self
    }

    /// Overrides the name-derived avatar with an explicit picsum seed.
    pub fn with_avatar_seed(mut self, seed: &str) -> Self {
        self.avatar_url = picsum_avatar(seed);
        self
    }

    /// "New" for members nobody has rated yet.
    pub fn rating_label(&self) -> String {
        if self.rating > 0.0 {
            format!("{:.1}", self.rating)
        } else {
            "New".to_string()
        }
    }

    pub fn filled_stars(&self) -> u8 {
        self.rating.round().clamp(0.0, 5.0) as u8
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

pub fn avatar_url_for(name: &str) -> String {
    let seed: String = name.split_whitespace().collect();
    picsum_avatar(&seed)
}

fn picsum_avatar(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/100/100", seed)
}
