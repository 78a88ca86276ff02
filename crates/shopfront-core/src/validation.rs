// Client-side input validation.
//
// Every precondition here is resolved before any network call is
// attempted; the gateway never sees input that fails these checks.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Number of digits in a verification code.
pub const CODE_LEN: usize = 6;

/// A local precondition failure. Never crosses the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEmail,
    PasswordTooShort,
    PasswordsDoNotMatch,
    IncompleteCode,
    EmptyField(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::PasswordTooShort => {
                write!(f, "Password must be at least {} characters", MIN_PASSWORD_LEN)
            }
            Self::PasswordsDoNotMatch => write!(f, "Passwords do not match"),
            Self::IncompleteCode => {
                write!(f, "Verification code must be {} digits", CODE_LEN)
            }
            Self::EmptyField(name) => write!(f, "{} must not be empty", name),
        }
    }
}

impl std::error::Error for ValidationError {}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Check that `email` looks like an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyField("email"));
    }
    if !email_regex().is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Check the password against the local policy.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Validate a full sign-up form.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }
    validate_email(email)?;
    validate_password(password)?;
    if password != confirm {
        return Err(ValidationError::PasswordsDoNotMatch);
    }
    Ok(())
}

/// Check that a verification code is complete: exactly `CODE_LEN` digits.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::IncompleteCode);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("user.name+tag@example.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(ValidationError::EmptyField("email")));
        assert_eq!(validate_email("not-an-email"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a b@c.com"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("secret1").is_ok());
        assert_eq!(validate_password("short"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password(""), Err(ValidationError::EmptyField("password")));
    }

    #[test]
    fn test_signup_validation() {
        assert!(validate_signup("Ana", "a@b.com", "secret1", "secret1").is_ok());
        assert_eq!(
            validate_signup("", "a@b.com", "secret1", "secret1"),
            Err(ValidationError::EmptyField("name"))
        );
        assert_eq!(
            validate_signup("Ana", "a@b.com", "secret1", "secret2"),
            Err(ValidationError::PasswordsDoNotMatch)
        );
    }

    #[test]
    fn test_code_completeness() {
        assert!(validate_code("123456").is_ok());
        assert_eq!(validate_code("12345"), Err(ValidationError::IncompleteCode));
        assert_eq!(validate_code("12345a"), Err(ValidationError::IncompleteCode));
        assert_eq!(validate_code(""), Err(ValidationError::IncompleteCode));
    }
}
