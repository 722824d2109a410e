use crate::utils::error::{Result, RosterError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::validation(format!(
            "{} cannot be empty or whitespace-only",
            field_name
        )));
    }
    Ok(())
}

/// 以字元數（非位元組數）檢查長度，全形字也算一個字
pub fn validate_max_chars(field_name: &str, value: &str, max_chars: usize) -> Result<()> {
    let length = value.chars().count();
    if length > max_chars {
        return Err(RosterError::validation(format!(
            "{} must be at most {} characters: got {}",
            field_name, max_chars, length
        )));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RosterError::validation(format!(
            "{} must be between {} and {}: got {}",
            field_name, min, max, value
        )));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RosterError::config(field_name, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(RosterError::config(field_name, "Path contains null bytes"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("name", "山田太郎").is_ok());
        assert!(validate_non_empty_string("name", "").is_err());
        assert!(validate_non_empty_string("name", "   ").is_err());
        assert!(validate_non_empty_string("name", "\u{3000}").is_err());
    }

    #[test]
    fn test_validate_max_chars_counts_characters() {
        assert!(validate_max_chars("name", &"あ".repeat(50), 50).is_ok());
        assert!(validate_max_chars("name", &"あ".repeat(51), 50).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("group_number", 1, 1, 8).is_ok());
        assert!(validate_range("group_number", 8, 1, 8).is_ok());
        assert!(validate_range("group_number", 0, 1, 8).is_err());
        assert!(validate_range("group_number", 9, 1, 8).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }
}
