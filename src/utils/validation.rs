use crate::utils::error::{FortuneError, Result};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FortuneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FortuneError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FortuneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FortuneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FortuneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| FortuneError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FortuneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(FortuneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses `YYYY-MM-DD`, ignoring any `T...` time suffix a date picker may append.
pub fn parse_birthdate(input: &str) -> Option<NaiveDate> {
    let date_part = input
        .split_once('T')
        .map(|(date, _)| date)
        .unwrap_or(input)
        .trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Gate run before any card is drawn. The question has to be strictly longer
/// than `min_length` characters.
pub fn validate_inputs(
    birthdate: Option<&str>,
    desire: Option<&str>,
    min_length: usize,
) -> Result<NaiveDate> {
    let birthdate = birthdate
        .filter(|value| !value.trim().is_empty())
        .and_then(parse_birthdate)
        .ok_or(FortuneError::MissingBirthdate)?;

    let length = desire.map(|text| text.chars().count()).unwrap_or(0);
    if length <= min_length {
        return Err(FortuneError::QuestionTooShort {
            min_length,
            actual: length,
        });
    }

    Ok(birthdate)
}
