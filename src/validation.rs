//! Form Validation
//!
//! Checks shared by the registration and checkout forms.

use thiserror::Error;

/// A form field failed validation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// First name is blank
    #[error("first name is required")]
    MissingFirstName,

    /// Last name is blank
    #[error("last name is required")]
    MissingLastName,

    /// Customer name is blank
    #[error("customer name is required")]
    MissingName,

    /// Email is not of the form `local@host.tld`
    #[error("email address is invalid")]
    InvalidEmail,

    /// Phone number is blank
    #[error("phone number is required")]
    MissingPhone,

    /// Password is shorter than the minimum
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length
        min: usize,
    },

    /// Card payment without a 16 digit card number
    #[error("card number must have {digits} digits")]
    InvalidCardNumber {
        /// Required number of digits
        digits: usize,
    },
}

/// Fail with `error` when `value` is blank.
pub(crate) fn require(value: &str, error: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

/// Check that `email` is `something@something.something` with no whitespace.
pub(crate) fn require_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    let (host, tld) = domain.rsplit_once('.').ok_or(ValidationError::InvalidEmail)?;

    if local.is_empty() || host.is_empty() || tld.is_empty() {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}
