// Error handling utilities for consistent error messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit with an internal error (exit code 2)
/// Internal errors are for configuration problems and store failures
pub fn internal_error(message: &str) -> ! {
    eprintln!("Internal error: {}", message);
    process::exit(2);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a page ID is valid (positive integer)
pub fn validate_page_id(id: i64) -> Result<i64, String> {
    if id > 0 {
        Ok(id)
    } else {
        Err(format!("Invalid ID: {}. IDs must be positive.", id))
    }
}

/// Validate locale format, e.g. `en` or `en_US`
pub fn validate_locale(locale: &str) -> Result<(), String> {
    let mut parts = locale.split('_');
    let language = parts.next().unwrap_or("");
    let region = parts.next();

    let language_ok = (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_lowercase());
    let region_ok = region
        .map(|r| (2..=3).contains(&r.len()) && r.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()))
        .unwrap_or(true);

    if language_ok && region_ok && parts.next().is_none() {
        Ok(())
    } else {
        Err(format!("Invalid locale: '{}'. Use a language code with an optional region, e.g. 'en' or 'en_US'.", locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("Header", "Name").is_ok());
        assert_eq!(validate_non_empty("  ", "Name"), Err("Name cannot be empty".to_string()));
    }

    #[test]
    fn test_validate_page_id() {
        assert_eq!(validate_page_id(3), Ok(3));
        assert!(validate_page_id(0).is_err());
        assert!(validate_page_id(-1).is_err());
    }

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("en_US").is_ok());
        assert!(validate_locale("es_419").is_ok());
        assert!(validate_locale("EN").is_err());
        assert!(validate_locale("en-US").is_err());
        assert!(validate_locale("en_US_x").is_err());
        assert!(validate_locale("").is_err());
    }
}
