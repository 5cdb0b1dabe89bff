//! Application context: the one owner of all mutable state.
//!
//! Every user action is a method on [`Session`] that runs to completion
//! before the next one starts.

use crate::chat::Conversation;
use crate::directory::ConversationDirectory;
use crate::entity::Identity;
use crate::error::AppError;
use crate::fixtures::Fixtures;
use crate::login::{self, LoginDetails};
use crate::ride::{Ride, RideCollection, RideDetails};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    MyRides,
    Messages,
    Profile,
    Chat,
}

#[derive(Debug, Default)]
pub struct Session {
    email_suffix: String,
    current_user: Option<Identity>,
    rides: RideCollection,
    directory: ConversationDirectory,
    view: View,
    /// Held by id so it always resolves to the directory's latest copy.
    active_conversation: Option<String>,
}

impl Session {
    pub fn new(email_suffix: impl Into<String>) -> Self {
        Self {
            email_suffix: email_suffix.into(),
            ..Self::default()
        }
    }

    pub fn seeded(email_suffix: impl Into<String>, fixtures: Fixtures) -> Self {
        info!(
            members = fixtures.members.len(),
            rides = fixtures.rides.len(),
            conversations = fixtures.conversations.len(),
            "Seeding session"
        );
        Self {
            rides: RideCollection::new(fixtures.rides),
            directory: ConversationDirectory::new(fixtures.conversations),
            ..Self::new(email_suffix)
        }
    }

    pub fn login(&mut self, details: LoginDetails) -> Result<&Identity, AppError> {
        let identity = login::login(details, &self.email_suffix)?;
        self.view = View::Dashboard;
        self.active_conversation = None;
        Ok(&*self.current_user.insert(identity))
    }

    pub fn current_user(&self) -> Result<&Identity, AppError> {
        self.current_user.as_ref().ok_or(AppError::NotLoggedIn)
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Navigates to one of the top-level views. Leaving the chat closes it.
    pub fn set_view(&mut self, view: View) -> Result<(), AppError> {
        self.current_user()?;
        if view == View::Chat {
            if self.active_conversation.is_none() {
                return Err(AppError::NoActiveConversation);
            }
        } else {
            self.active_conversation = None;
        }
        debug!(?view, "Navigating");
        self.view = view;
        Ok(())
    }

    pub fn rides(&self) -> &RideCollection {
        &self.rides
    }

    pub fn directory(&self) -> &ConversationDirectory {
        &self.directory
    }

    pub fn offer_ride(&mut self, details: RideDetails) -> Result<Ride, AppError> {
        let driver = self.current_user()?.clone();
        Ok(self.rides.offer_ride(details, driver))
    }

    pub fn my_rides(&self) -> Result<impl Iterator<Item = &Ride> + '_, AppError> {
        let user = self.current_user()?;
        Ok(self.rides.rides_for(&user.id))
    }

    pub fn my_conversations(&self) -> Result<impl Iterator<Item = &Conversation> + '_, AppError> {
        let user = self.current_user()?;
        Ok(self.directory.conversations_for(&user.id))
    }

    /// Opens (creating if needed) the conversation with the ride's driver.
    pub fn start_chat(&mut self, ride_id: &str) -> Result<Conversation, AppError> {
        let user = self.current_user()?.clone();
        let ride = self
            .rides
            .get(ride_id)
            .ok_or_else(|| AppError::RideNotFound(ride_id.to_string()))?
            .clone();

        let conversation = self.directory.find_or_create(&ride, &user)?;
        self.activate(&conversation.id);
        Ok(conversation)
    }

    /// Reopens a conversation from the message list.
    pub fn open_conversation(&mut self, conversation_id: &str) -> Result<Conversation, AppError> {
        let user = self.current_user()?;
        let conversation = self
            .directory
            .get(conversation_id)
            .filter(|c| c.involves(&user.id))
            .ok_or_else(|| AppError::ConversationNotFound(conversation_id.to_string()))?
            .clone();

        self.activate(&conversation.id);
        Ok(conversation)
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation
            .as_deref()
            .and_then(|id| self.directory.get(id))
    }

    /// Sends `text` to the open conversation and returns its latest state.
    /// Blank text changes nothing.
    pub fn send_message(&mut self, text: &str) -> Result<Conversation, AppError> {
        let user = self.current_user.as_ref().ok_or(AppError::NotLoggedIn)?;
        let conversation_id = self
            .active_conversation
            .as_deref()
            .ok_or(AppError::NoActiveConversation)?;

        match self.directory.append_message(conversation_id, user, text)? {
            Some(updated) => Ok(updated),
            None => self
                .directory
                .get(conversation_id)
                .cloned()
                .ok_or_else(|| AppError::ConversationNotFound(conversation_id.to_string())),
        }
    }

    pub fn close_chat(&mut self) {
        self.active_conversation = None;
        self.view = View::Messages;
    }

    fn activate(&mut self, conversation_id: &str) {
        self.active_conversation = Some(conversation_id.to_string());
        self.view = View::Chat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::{Duration, Utc};

    fn logged_in() -> Session {
        let mut session = Session::seeded(".edu", fixtures::seed(Utc::now()));
        session
            .login(LoginDetails {
                name: "Sam Lee".to_string(),
                email: "sam@college.edu".to_string(),
                registration_number: "REG1".to_string(),
                department: "Physics".to_string(),
            })
            .unwrap();
        session
    }

    fn details() -> RideDetails {
        RideDetails {
            origin: "Stadium".to_string(),
            destination: "Mall".to_string(),
            departure_time: Utc::now() + Duration::hours(5),
            total_seats: 2,
            price: 3,
        }
    }

    #[test]
    fn test_actions_require_login() {
        let mut session = Session::seeded(".edu", fixtures::seed(Utc::now()));
        assert_eq!(session.current_user().unwrap_err(), AppError::NotLoggedIn);
        assert_eq!(session.offer_ride(details()).unwrap_err(), AppError::NotLoggedIn);
        assert_eq!(session.start_chat("r1").unwrap_err(), AppError::NotLoggedIn);
        assert_eq!(session.send_message("hi").unwrap_err(), AppError::NotLoggedIn);
        assert!(session.my_rides().is_err());
        assert_eq!(session.rides().len(), 3);
    }

    #[test]
    fn test_failed_login_leaves_session_untouched() {
        let mut session = Session::new(".edu");
        let result = session.login(LoginDetails {
            name: "Sam Lee".to_string(),
            email: "sam@gmail.com".to_string(),
            registration_number: "REG1".to_string(),
            department: "Physics".to_string(),
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(session.current_user().is_err());
    }

    #[test]
    fn test_offered_ride_shows_in_my_rides() {
        let mut session = logged_in();
        let ride = session.offer_ride(details()).unwrap();

        assert_eq!(session.rides().all()[0].id, ride.id);
        let mine: Vec<String> = session.my_rides().unwrap().map(|r| r.id.clone()).collect();
        assert_eq!(mine, vec![ride.id]);
    }

    #[test]
    fn test_start_chat_then_send() {
        let mut session = logged_in();
        let convo = session.start_chat("r2").unwrap();
        assert_eq!(session.view(), View::Chat);

        let updated = session.send_message("Is there room for a suitcase?").unwrap();
        assert_eq!(updated.id, convo.id);
        assert_eq!(updated.messages.len(), 1);

        let active = session.active_conversation().unwrap();
        assert_eq!(active, &updated);
        assert_eq!(session.directory().get(&convo.id), Some(&updated));
    }

    #[test]
    fn test_start_chat_twice_reuses_conversation() {
        let mut session = logged_in();
        let first = session.start_chat("r2").unwrap();
        session.close_chat();
        let second = session.start_chat("r2").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(session.my_conversations().unwrap().count(), 1);
    }

    #[test]
    fn test_cannot_chat_about_own_ride() {
        let mut session = logged_in();
        let ride = session.offer_ride(details()).unwrap();
        assert_eq!(
            session.start_chat(&ride.id).unwrap_err(),
            AppError::InvalidParticipant
        );
        assert_eq!(session.view(), View::Dashboard);
    }

    #[test]
    fn test_unknown_ride() {
        let mut session = logged_in();
        assert_eq!(
            session.start_chat("r404").unwrap_err(),
            AppError::RideNotFound("r404".to_string())
        );
    }

    #[test]
    fn test_cannot_open_someone_elses_conversation() {
        let mut session = logged_in();
        assert_eq!(
            session.open_conversation("c1").unwrap_err(),
            AppError::ConversationNotFound("c1".to_string())
        );
    }

    #[test]
    fn test_send_without_open_chat() {
        let mut session = logged_in();
        assert_eq!(
            session.send_message("hi").unwrap_err(),
            AppError::NoActiveConversation
        );
    }

    #[test]
    fn test_blank_message_returns_unchanged_conversation() {
        let mut session = logged_in();
        session.start_chat("r1").unwrap();
        let unchanged = session.send_message("   ").unwrap();
        assert!(unchanged.messages.is_empty());
    }

    #[test]
    fn test_navigation_closes_chat() {
        let mut session = logged_in();
        session.start_chat("r1").unwrap();
        session.set_view(View::Profile).unwrap();

        assert_eq!(session.view(), View::Profile);
        assert!(session.active_conversation().is_none());
        assert_eq!(
            session.set_view(View::Chat).unwrap_err(),
            AppError::NoActiveConversation
        );
    }

    #[test]
    fn test_close_chat_returns_to_messages() {
        let mut session = logged_in();
        let convo = session.start_chat("r3").unwrap();
        session.close_chat();
        assert_eq!(session.view(), View::Messages);

        let reopened = session.open_conversation(&convo.id).unwrap();
        assert_eq!(reopened.id, convo.id);
        assert_eq!(session.view(), View::Chat);
    }
}
