use std::sync::OnceLock;

use regex::Regex;

use shared_models::error::{AppError, FieldError};

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("valid phone regex"))
}

/// Request bodies implement this to run their field checks before a
/// service is called.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// Collects field errors and turns them into a single `AppError::Validation`.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, "is required"));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !email_pattern().is_match(value.trim()) {
            self.errors.push(FieldError::new(field, "must be a valid email address"));
        }
        self
    }

    pub fn optional_email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.email(field, v),
            None => self,
        }
    }

    pub fn optional_phone(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if !phone_pattern().is_match(v.trim()) {
                self.errors.push(FieldError::new(field, "must be a valid phone number"));
            }
        }
        self
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.errors.push(FieldError::new(field, format!("must be at least {} characters", min)));
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: i64) -> &mut Self {
        if value <= 0 {
            self.errors.push(FieldError::new(field, "must be greater than zero"));
        }
        self
    }

    pub fn optional_positive_f64(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if let Some(v) = value {
            if !(v > 0.0) {
                self.errors.push(FieldError::new(field, "must be greater than zero"));
            }
        }
        self
    }

    pub fn check(&mut self, condition: bool, field: &str, message: &str) -> &mut Self {
        if !condition {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}
