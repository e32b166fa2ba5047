//! Session Models

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require, require_email};

/// Signed-in customer, stored as JSON under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: u64,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address, used to sign in
    pub email: String,

    /// Phone number
    pub phone: String,
}

impl User {
    /// Given and family name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Chosen password; checked for length, never stored
    pub password: String,
}

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

impl NewUser {
    /// Check the form, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.first_name, ValidationError::MissingFirstName)?;
        require(&self.last_name, ValidationError::MissingLastName)?;
        require_email(&self.email)?;
        require(&self.phone, ValidationError::MissingPhone)?;

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewUser {
        NewUser {
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+7 (900) 000-00-00".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn user_serializes_with_camel_case_keys() -> Result<(), serde_json::Error> {
        let user = User {
            id: 1,
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            email: "demo@example.com".to_string(),
            phone: "+7 (999) 123-45-67".to_string(),
        };

        let json = serde_json::to_string(&user)?;

        assert!(json.contains("\"firstName\":\"Demo\""));
        assert!(json.contains("\"lastName\":\"User\""));
        assert_eq!(serde_json::from_str::<User>(&json)?, user);
        assert_eq!(user.full_name(), "Demo User");

        Ok(())
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(form().validate(), Ok(()));
    }

    #[test]
    fn invalid_forms_report_the_failing_field() {
        let cases = [
            (
                NewUser {
                    first_name: " ".to_string(),
                    ..form()
                },
                ValidationError::MissingFirstName,
            ),
            (
                NewUser {
                    last_name: String::new(),
                    ..form()
                },
                ValidationError::MissingLastName,
            ),
            (
                NewUser {
                    email: "anna.example.com".to_string(),
                    ..form()
                },
                ValidationError::InvalidEmail,
            ),
            (
                NewUser {
                    email: "anna@localhost".to_string(),
                    ..form()
                },
                ValidationError::InvalidEmail,
            ),
            (
                NewUser {
                    phone: String::new(),
                    ..form()
                },
                ValidationError::MissingPhone,
            ),
            (
                NewUser {
                    password: "12345".to_string(),
                    ..form()
                },
                ValidationError::PasswordTooShort { min: 6 },
            ),
        ];

        for (case, expected) in cases {
            assert_eq!(case.validate(), Err(expected), "{case:?}");
        }
    }
}
