//! Demo community the session starts with.

use crate::chat::{ChatMessage, Conversation};
use crate::entity::Identity;
use crate::ride::Ride;
use chrono::{DateTime, Duration, Utc};

pub struct Fixtures {
    pub members: Vec<Identity>,
    pub rides: Vec<Ride>,
    pub conversations: Vec<Conversation>,
}

pub fn seed(now: DateTime<Utc>) -> Fixtures {
    let alex = Identity::new(
        "u1",
        "Alex Johnson",
        "alex.j@university.edu",
        "CB.EN.U4CSE19001",
        "Computer Science",
    )
    .with_reputation(4.8, 15)
    .with_avatar_seed("alex");
    let brenda = Identity::new(
        "u2",
        "Brenda Smith",
        "brenda.s@university.edu",
        "CB.EN.U4MEC19010",
        "Mechanical Engineering",
    )
    .with_reputation(4.9, 22)
    .with_avatar_seed("brenda");
    let charlie = Identity::new(
        "u3",
        "Charlie Brown",
        "charlie.b@university.edu",
        "CB.EN.U4ECE19020",
        "Electronics & Communication",
    )
    .with_reputation(4.5, 5)
    .with_avatar_seed("charlie");
    let diana = Identity::new(
        "u4",
        "Diana Prince",
        "diana.p@university.edu",
        "CB.EN.U4EEE19030",
        "Electrical Engineering",
    )
    .with_reputation(5.0, 30)
    .with_avatar_seed("diana");

    let rides = vec![
        Ride {
            id: "r1".to_string(),
            driver: brenda.clone(),
            origin: "Main Campus".to_string(),
            destination: "Downtown".to_string(),
            departure_time: now + Duration::hours(2),
            available_seats: 2,
            total_seats: 4,
            price: 5,
            passengers: vec![charlie.clone()],
        },
        Ride {
            id: "r2".to_string(),
            driver: diana.clone(),
            origin: "North Dorms".to_string(),
            destination: "Airport".to_string(),
            departure_time: now + Duration::hours(24),
            available_seats: 3,
            total_seats: 3,
            price: 15,
            passengers: Vec::new(),
        },
        Ride {
            id: "r3".to_string(),
            driver: alex.clone(),
            origin: "Library".to_string(),
            destination: "West Suburbs".to_string(),
            departure_time: now + Duration::days(3),
            available_seats: 1,
            total_seats: 2,
            price: 8,
            passengers: Vec::new(),
        },
    ];

    let mut thread = Conversation::new("r1", alex.clone(), brenda.clone());
    thread.id = "c1".to_string();
    thread.messages = vec![
        ChatMessage {
            id: "m1".to_string(),
            sender_id: alex.id.clone(),
            text: "Hey, are you still good for the ride tomorrow?".to_string(),
            timestamp: now - Duration::minutes(5),
        },
        ChatMessage {
            id: "m2".to_string(),
            sender_id: brenda.id.clone(),
            text: "Yep! See you at the library entrance at 2 PM.".to_string(),
            timestamp: now - Duration::minutes(4),
        },
    ];

    Fixtures {
        members: vec![alex, brenda, charlie, diana],
        rides,
        conversations: vec![thread],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rides_hold_seat_invariant() {
        let fixtures = seed(Utc::now());
        assert_eq!(fixtures.rides.len(), 3);
        assert!(fixtures.rides.iter().all(Ride::seats_consistent));
    }

    #[test]
    fn test_seeded_conversation_matches_ride() {
        let fixtures = seed(Utc::now());
        let thread = &fixtures.conversations[0];
        let ride = fixtures.rides.iter().find(|r| r.id == thread.ride_id).unwrap();

        assert!(thread.involves(&ride.driver.id));
        assert_eq!(thread.participants.len(), 2);
        assert_eq!(thread.messages.len(), 2);
    }

    #[test]
    fn test_seeded_avatars_use_first_name_seeds() {
        let fixtures = seed(Utc::now());
        let avatars: Vec<&str> = fixtures.members.iter().map(|m| m.avatar_url.as_str()).collect();
        assert_eq!(
            avatars,
            vec![
                "https://picsum.photos/seed/alex/100/100",
                "https://picsum.photos/seed/brenda/100/100",
                "https://picsum.photos/seed/charlie/100/100",
                "https://picsum.photos/seed/diana/100/100",
            ]
        );
        assert_eq!(fixtures.rides[0].driver.avatar_url, avatars[1]);
    }

    #[test]
    fn test_seeded_member_ids_are_unique() {
        let fixtures = seed(Utc::now());
        let mut ids: Vec<&str> = fixtures.members.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), fixtures.members.len());
    }
}
