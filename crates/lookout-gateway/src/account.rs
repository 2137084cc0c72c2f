//! Account creation through the gateway's `register` action.

use lookout_core::CoreError;

const MIN_USERNAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 4;

/// A validated account-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    username: String,
    email: String,
    password: String,
}

impl NewAccount {
    /// Trim and check the fields the gateway expects.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a field is empty, the username
    /// is shorter than 3 characters, the password shorter than 4, the
    /// confirmation does not match, or the terms were not accepted.
    pub fn new(
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
        accepted_terms: bool,
    ) -> Result<Self, CoreError> {
        let (username, email, password, confirm) =
            (username.trim(), email.trim(), password.trim(), confirm.trim());

        if username.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(CoreError::Validation("please fill all fields".into()));
        }
        if password != confirm {
            return Err(CoreError::Validation("passwords do not match".into()));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(CoreError::Validation(format!(
                "password must contain at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        if username.chars().count() < MIN_USERNAME_CHARS {
            return Err(CoreError::Validation(format!(
                "username must contain at least {MIN_USERNAME_CHARS} characters"
            )));
        }
        if !accepted_terms {
            return Err(CoreError::Validation(
                "the privacy policy and terms of service must be accepted".into(),
            ));
        }

        Ok(Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

/// A created account and its first session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub token: String,
    pub username: String,
}
