use thiserror::Error;

/// Errors that can occur when validating account fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Username too long (max 64 characters)")]
    UsernameTooLong,
    #[error("Username cannot contain whitespace")]
    UsernameWhitespace,
    #[error("Username cannot contain '@'")]
    UsernameContainsAt,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error("Password too long (max 72 bytes)")]
    PasswordTooLong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_display() {
        assert_eq!(
            IdentityError::EmptyUsername.to_string(),
            "Username cannot be empty"
        );
        assert_eq!(
            IdentityError::InvalidEmail("nobody".to_string()).to_string(),
            "Invalid email address: nobody"
        );
    }
}
