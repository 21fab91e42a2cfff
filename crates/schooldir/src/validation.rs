//! Field rules for the school intake form.
//!
//! The same rule set runs in the client before a submission leaves the
//! machine and again on the server before anything is written.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::image::ImageUpload;
use crate::school::SchoolForm;

// ASCII letters only.
static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+]?[0-9\-\s]{10,}$").unwrap());

static RE_PINCODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

const NAME_MIN_CHARS: usize = 2;
const ADDRESS_MIN_CHARS: usize = 10;

/// A form field a rule can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    Pincode,
    Image,
}

impl Field {
    /// The multipart part name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::City => "city",
            Field::State => "state",
            Field::Pincode => "pincode",
            Field::Image => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation, scoped to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// All rule violations of one form, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, if that field failed.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Field name to message map, as sent in the HTTP error body.
    pub fn to_map(&self) -> BTreeMap<&'static str, &'static str> {
        self.errors
            .iter()
            .map(|e| (e.field.as_str(), e.message))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects field errors for one submission.
pub struct IntakeValidator {
    errors: Vec<FieldError>,
}

impl IntakeValidator {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Runs every rule against the form and the optional image.
    pub fn validate(
        &mut self,
        form: &SchoolForm,
        image: Option<&ImageUpload>,
    ) -> Result<(), ValidationErrors> {
        self.errors.clear();

        self.check_name(&form.name);
        self.check_email(&form.email);
        self.check_phone(&form.phone);
        self.check_address(&form.address);
        self.check_required(Field::City, &form.city, "City is required");
        self.check_required(Field::State, &form.state, "State is required");
        self.check_pincode(&form.pincode);

        if let Some(image) = image {
            self.check_image(image);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }

    fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Pushes `message` when the value is empty or whitespace. Returns whether it passed.
    ///
    /// Whitespace-only input is rejected as missing, a stricter rule than a
    /// plain emptiness check.
    fn check_required(&mut self, field: Field, value: &str, message: &'static str) -> bool {
        if value.trim().is_empty() {
            self.push(field, message);
            return false;
        }
        true
    }

    fn check_name(&mut self, value: &str) {
        if self.check_required(Field::Name, value, "School name is required")
            && value.chars().count() < NAME_MIN_CHARS
        {
            self.push(Field::Name, "School name must be at least 2 characters");
        }
    }

    fn check_email(&mut self, value: &str) {
        if self.check_required(Field::Email, value, "Email is required") && !RE_EMAIL.is_match(value)
        {
            self.push(Field::Email, "Please enter a valid email address");
        }
    }

    fn check_phone(&mut self, value: &str) {
        if self.check_required(Field::Phone, value, "Phone number is required")
            && !RE_PHONE.is_match(value)
        {
            self.push(Field::Phone, "Please enter a valid phone number");
        }
    }

    fn check_address(&mut self, value: &str) {
        if self.check_required(Field::Address, value, "Address is required")
            && value.chars().count() < ADDRESS_MIN_CHARS
        {
            self.push(Field::Address, "Address must be at least 10 characters");
        }
    }

    fn check_pincode(&mut self, value: &str) {
        if self.check_required(Field::Pincode, value, "Pincode is required")
            && !RE_PINCODE.is_match(value)
        {
            self.push(Field::Pincode, "Pincode must be 6 digits");
        }
    }

    // Empty uploads are treated as "no image" and never reach this check.
    fn check_image(&mut self, image: &ImageUpload) {
        if !image.is_empty() && !image.is_image() {
            self.push(Field::Image, "Only image files are allowed");
        }
    }
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a form with a fresh [`IntakeValidator`].
pub fn validate(form: &SchoolForm, image: Option<&ImageUpload>) -> Result<(), ValidationErrors> {
    IntakeValidator::new().validate(form, image)
}
