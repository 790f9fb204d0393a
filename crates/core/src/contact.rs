//! Contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Email;
use crate::validation::ValidationErrors;

/// Raw contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl ContactForm {
    /// Validate the form into a message stamped `received_at`.
    ///
    /// # Errors
    ///
    /// Returns every field failure at once.
    pub fn validate(&self, received_at: DateTime<Utc>) -> Result<ContactMessage, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("name", "Name", &self.name);
        let email = if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
            None
        } else {
            Email::parse(&self.email)
                .map_err(|_| errors.add("email", "Please enter a valid email address"))
                .ok()
        };
        errors.require("message", "Message", &self.message);

        match email {
            Some(email) if errors.is_empty() => {
                let subject = self.subject.trim();
                Ok(ContactMessage {
                    name: self.name.trim().to_string(),
                    email,
                    subject: (!subject.is_empty()).then(|| subject.to_string()),
                    message: self.message.trim().to_string(),
                    received_at,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_message_without_subject() {
        let form = ContactForm {
            name: "Linus".to_string(),
            email: "linus@example.org".to_string(),
            subject: "  ".to_string(),
            message: "Where is my order?".to_string(),
        };
        let message = form.validate(Utc::now()).unwrap();
        assert_eq!(message.subject, None);
        assert_eq!(message.email.as_str(), "linus@example.org");
    }

    #[test]
    fn test_required_fields() {
        let errors = ContactForm::default().validate(Utc::now()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has("name") && errors.has("email") && errors.has("message"));
    }

    #[test]
    fn test_invalid_email() {
        let form = ContactForm {
            name: "Linus".to_string(),
            email: "linus@".to_string(),
            message: "Hi".to_string(),
            ..ContactForm::default()
        };
        assert!(form.validate(Utc::now()).unwrap_err().has("email"));
    }
}
