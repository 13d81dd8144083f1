//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();

    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate phone number: digits with optional `+`, spaces, dashes, dots
/// and parentheses
pub fn validate_phone_number(phone_number: &str) -> Result<(), String> {
    if phone_number.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 ().-]{5,23}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone_number.trim()) {
        return Err("Invalid phone number format".to_string());
    }

    Ok(())
}

/// Canonical form of an email for lookups and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user1@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert_eq!(
            validate_password("short"),
            Err("Password must be at least 8 characters long".to_string())
        );
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("123-456-7891").is_ok());
        assert!(validate_phone_number("+1 (555) 555-5551").is_ok());
        assert!(validate_phone_number("").is_err());
        assert!(validate_phone_number("call me").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Service Provider 1").is_ok());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User1@Example.COM "), "user1@example.com");
    }
}
