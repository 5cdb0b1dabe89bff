use crate::entity::Identity;
use crate::error::AppError;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDetails {
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub department: String,
}

impl LoginDetails {
    /// Every field of the login form is required.
    pub fn require_fields(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("registration number", &self.registration_number),
            ("department", &self.department),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Admits anyone whose email ends in `domain_suffix` (case-insensitive)
/// and mints a fresh, unrated identity for them.
pub fn login(details: LoginDetails, domain_suffix: &str) -> Result<Identity, AppError> {
    if !details
        .email
        .to_lowercase()
        .ends_with(&domain_suffix.to_lowercase())
    {
        warn!(email = %details.email, "Rejected login with non-institutional email");
        return Err(AppError::Validation(format!(
            "Please use a valid university email address ({}).",
            domain_suffix
        )));
    }

    let identity = Identity::new(
        format!("u-{}", Uuid::new_v4().simple()),
        details.name,
        details.email,
        details.registration_number,
        details.department,
    );
    info!(user = %identity, "Logged in");
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(email: &str) -> LoginDetails {
        LoginDetails {
            name: "Sam Lee".to_string(),
            email: email.to_string(),
            registration_number: "CB.EN.U4CSE20001".to_string(),
            department: "Computer Science".to_string(),
        }
    }

    #[test]
    fn test_edu_email_is_admitted() {
        let identity = login(details("a@b.edu"), ".edu").unwrap();
        assert_eq!(identity.rating, 0.0);
        assert_eq!(identity.rides_given, 0);
        assert_eq!(identity.college_email, "a@b.edu");
        assert_eq!(identity.avatar_url, "https://picsum.photos/seed/SamLee/100/100");
        assert!(identity.id.starts_with("u-"));
    }

    #[test]
    fn test_suffix_check_ignores_case() {
        assert!(login(details("Sam.Lee@Campus.EDU"), ".edu").is_ok());
    }

    #[test]
    fn test_other_domains_are_rejected() {
        let err = login(details("a@b.com"), ".edu").unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("Please use a valid university email address (.edu).".to_string())
        );
    }

    #[test]
    fn test_login_ids_are_fresh() {
        let a = login(details("a@b.edu"), ".edu").unwrap();
        let b = login(details("a@b.edu"), ".edu").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_required_fields() {
        assert!(details("a@b.edu").require_fields().is_ok());

        let mut blank = details("a@b.edu");
        blank.department = "  ".to_string();
        blank.name = String::new();
        assert_eq!(
            blank.require_fields(),
            Err(AppError::Validation(
                "Missing required fields: name, department".to_string()
            ))
        );
    }
}
