use super::error::IdentityError;
use super::requests::{CreateUserRequest, UpdateUserRequest};

const MAX_USERNAME_CHARS: usize = 64;
const MAX_EMAIL_CHARS: usize = 254;
/// bcrypt silently ignores input past 72 bytes.
const MAX_PASSWORD_BYTES: usize = 72;

/// Validates a username.
pub fn validate_username(username: &str) -> Result<(), IdentityError> {
    if username.trim().is_empty() {
        return Err(IdentityError::EmptyUsername);
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(IdentityError::UsernameTooLong);
    }
    if username.chars().any(char::is_whitespace) {
        return Err(IdentityError::UsernameWhitespace);
    }
    if username.contains('@') {
        return Err(IdentityError::UsernameContainsAt);
    }
    Ok(())
}

/// Validates the shape of an email address.
///
/// Requires exactly one `@`, a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), IdentityError> {
    let invalid = || IdentityError::InvalidEmail(email.to_string());

    if email.chars().count() > MAX_EMAIL_CHARS || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.is_empty() {
        return Err(IdentityError::EmptyPassword);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(IdentityError::PasswordTooLong);
    }
    Ok(())
}

/// Validates a registration or create request.
pub fn validate_new_user(request: &CreateUserRequest) -> Result<(), IdentityError> {
    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password)
}

/// Validates the fields present in an update request.
pub fn validate_user_update(request: &UpdateUserRequest) -> Result<(), IdentityError> {
    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if let Some(password) = &request.password {
        validate_password(password)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("user_1.dev-team").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert_eq!(validate_username("   "), Err(IdentityError::EmptyUsername));
        assert_eq!(
            validate_username("al ice"),
            Err(IdentityError::UsernameWhitespace)
        );
        assert_eq!(
            validate_username("alice@home"),
            Err(IdentityError::UsernameContainsAt)
        );
        assert_eq!(
            validate_username(&"a".repeat(65)),
            Err(IdentityError::UsernameTooLong)
        );
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("admin@lapsusint.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "alice",
            "@x.com",
            "alice@",
            "alice@localhost",
            "alice@x..com",
            "alice@@x.com",
            "a@b@c.com",
            "alice @x.com",
            "alice@.com",
        ] {
            assert!(validate_email(email).is_err(), "{email:?} should be rejected");
        }
    }

    #[test]
    fn test_password_limits() {
        assert!(validate_password("secret1").is_ok());
        assert_eq!(validate_password(""), Err(IdentityError::EmptyPassword));
        assert!(validate_password(&"p".repeat(72)).is_ok());
        assert_eq!(
            validate_password(&"p".repeat(73)),
            Err(IdentityError::PasswordTooLong)
        );
    }

    #[test]
    fn test_validate_new_user_checks_every_field() {
        let ok = CreateUserRequest::new("alice", "alice@x.com", "secret1");
        assert!(validate_new_user(&ok).is_ok());

        let bad_email = CreateUserRequest::new("alice", "not-an-email", "secret1");
        assert!(matches!(
            validate_new_user(&bad_email),
            Err(IdentityError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_user_update_skips_absent_fields() {
        assert!(validate_user_update(&UpdateUserRequest::new()).is_ok());
        let bad = UpdateUserRequest::new().with_password("");
        assert_eq!(validate_user_update(&bad), Err(IdentityError::EmptyPassword));
    }
}
