use crate::utils::error::{ConsoleError, FieldError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ConsoleError {
    ConsoleError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute http(s) URLs only.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "URL is empty"));
    }
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("not a URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            value,
            format!("scheme {} is not http or https", url.scheme()),
        ));
    }
    Ok(())
}

pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, format!("expected {} to {}", min, max)))
    }
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    match value.trim() {
        "" => Err(invalid(field, value, "must not be blank")),
        _ => Ok(()),
    }
}

/// Collects field errors for forms, where every problem is reported at once
/// instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn require(&mut self, field: &str, value: Option<&str>) {
        if value.map(|v| v.trim().is_empty()).unwrap_or(true) {
            self.push(field, "is required");
        }
    }

    pub fn require_http_url(&mut self, field: &str, value: Option<&str>) {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => self.push(field, "is required"),
            Some(v) => {
                if validate_url(field, v).is_err() {
                    self.push(field, "must be an http(s) URL");
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::ValidationError {
                errors: self.errors,
            })
        }
    }
}
