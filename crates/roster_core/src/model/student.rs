//! Student record model and field validators.
//!
//! # Responsibility
//! - Define the persisted student shape and the raw console input shapes.
//! - Check syntactic well-formedness of every field before persistence.
//!
//! # Invariants
//! - Validators are pure predicates over raw text; they never touch storage.
//! - `name`, `course` and `email` are trimmed at conversion time, `id` is
//!   stored verbatim.
//! - A supplied-but-blank update field is invalid, not "unchanged".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static AGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid age regex"));
static ALPHA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}").expect("valid alphabetic regex"));

/// Persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Operator-chosen identifier, primary key in storage.
    pub id: String,
    pub name: String,
    pub age: u32,
    pub course: String,
    pub email: String,
}

/// Raw console input for the add operation. Every field arrives as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStudent {
    pub id: String,
    pub name: String,
    pub age: String,
    pub course: String,
    pub email: String,
}

/// Field-wise patch for the update operation.
///
/// `None` means "leave unchanged". A supplied empty string is a present,
/// invalid value, so blank console input stays distinguishable from an
/// absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<String>,
    pub course: Option<String>,
    pub email: Option<String>,
}

impl StudentPatch {
    /// Returns true when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.course.is_none() && self.email.is_none()
    }
}

/// Validation error for one student field.
///
/// The `Display` text is the operator-facing failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentValidationError {
    Id,
    Name,
    Age,
    Course,
    Email,
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id => write!(f, "invalid id: must not be empty or contain spaces"),
            Self::Name => write!(f, "invalid name: must contain at least one letter"),
            Self::Age => write!(f, "invalid age: must be a whole number greater than zero"),
            Self::Course => write!(f, "invalid course: must be at least 2 characters"),
            Self::Email => write!(f, "invalid email: expected a single `@` with a `.` after it"),
        }
    }
}

impl Error for StudentValidationError {}

/// Returns true when `id` is non-empty and contains no space character.
pub fn valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(' ')
}

/// Returns true when `name` is non-empty and has at least one letter.
pub fn valid_name(name: &str) -> bool {
    !name.is_empty() && ALPHA_RE.is_match(name)
}

/// Returns true when `age` is all decimal digits with a value above zero.
///
/// Signs are not digits, so negative ages cannot be expressed at all.
pub fn valid_age(age: &str) -> bool {
    AGE_RE.is_match(age) && age.parse::<u32>().is_ok_and(|value| value > 0)
}

/// Returns true when `course` trims to at least two characters.
pub fn valid_course(course: &str) -> bool {
    !course.is_empty() && course.trim().len() >= 2
}

/// Returns true when `email` has no space, exactly one `@`, and a `.`
/// somewhere after the `@`. No further syntax checking is attempted.
pub fn valid_email(email: &str) -> bool {
    if email.is_empty() || email.contains(' ') {
        return false;
    }
    match email.split_once('@') {
        Some((_, domain)) => !domain.contains('@') && domain.contains('.'),
        None => false,
    }
}

impl NewStudent {
    /// Validates every field in entry order and builds the persisted record.
    ///
    /// Fails fast on the first invalid field: id, name, age, course, email.
    pub fn into_record(self) -> Result<StudentRecord, StudentValidationError> {
        if !valid_id(&self.id) {
            return Err(StudentValidationError::Id);
        }
        if !valid_name(&self.name) {
            return Err(StudentValidationError::Name);
        }
        if !valid_age(&self.age) {
            return Err(StudentValidationError::Age);
        }
        if !valid_course(&self.course) {
            return Err(StudentValidationError::Course);
        }
        if !valid_email(&self.email) {
            return Err(StudentValidationError::Email);
        }

        let age = self
            .age
            .parse::<u32>()
            .map_err(|_| StudentValidationError::Age)?;

        Ok(StudentRecord {
            id: self.id,
            name: self.name.trim().to_string(),
            age,
            course: self.course.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NewStudent, StudentPatch, StudentValidationError};

    fn sample_input() -> NewStudent {
        NewStudent {
            id: "s-100".to_string(),
            name: " Ada Lovelace ".to_string(),
            age: "27".to_string(),
            course: " Mathematics ".to_string(),
            email: "ada@example.org".to_string(),
        }
    }

    #[test]
    fn into_record_trims_name_course_and_email() {
        let record = sample_input().into_record().unwrap();
        assert_eq!(record.id, "s-100");
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.age, 27);
        assert_eq!(record.course, "Mathematics");
        assert_eq!(record.email, "ada@example.org");
    }

    #[test]
    fn into_record_fails_on_first_invalid_field_in_entry_order() {
        let mut input = sample_input();
        input.name = "***".to_string();
        input.age = "abc".to_string();

        let err = input.into_record().unwrap_err();
        assert_eq!(err, StudentValidationError::Name);
    }

    #[test]
    fn patch_is_empty_only_without_any_supplied_field() {
        assert!(StudentPatch::default().is_empty());

        let patch = StudentPatch {
            course: Some(String::new()),
            ..StudentPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
