//! Student record operations.
//!
//! # Responsibility
//! - Validate raw console input and delegate persistence to a repository.
//! - Translate every failure into an operator-facing message via `Display`.
//!
//! # Invariants
//! - Fields are validated in entry order and operations fail on the first
//!   invalid field.
//! - No operation retries; a transport failure aborts the operation and is
//!   reported once.
//! - An update without any supplied field is an error, not a no-op.

use crate::model::student::{
    valid_age, valid_course, valid_email, valid_id, valid_name, NewStudent, StudentPatch,
    StudentRecord, StudentValidationError,
};
use crate::repo::student_repo::{RepoError, StudentFieldSet, StudentRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for student record operations.
///
/// The `Display` text of each variant is exactly what the console prints.
#[derive(Debug)]
pub enum ServiceError {
    /// A field failed its format check.
    Validation(StudentValidationError),
    /// Another record already owns the id.
    DuplicateId(String),
    /// Another record already owns the email.
    EmailInUse(String),
    /// The target record does not exist.
    NotFound(String),
    /// An update was requested with no fields supplied.
    NoFieldsToUpdate,
    /// Write succeeded but the read-back found nothing.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "student id already exists: `{id}`"),
            Self::EmailInUse(email) => write!(f, "email already in use: `{email}`"),
            Self::NotFound(id) => write!(f, "no such student: `{id}`"),
            Self::NoFieldsToUpdate => write!(f, "no fields to update"),
            Self::InconsistentState(details) => write!(f, "inconsistent student state: {details}"),
            Self::Repo(err) => write!(f, "database error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for ServiceError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateId(id) => Self::DuplicateId(id),
            RepoError::EmailInUse(email) => Self::EmailInUse(email),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Record-operations facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one student from raw console input.
    ///
    /// # Contract
    /// - Validates id, name, age, course, email in that order, failing fast.
    /// - Rejects a duplicate id before a conflicting email.
    /// - Persists trimmed name/course/email and the parsed age.
    pub fn add_student(&mut self, input: NewStudent) -> Result<StudentRecord, ServiceError> {
        let record = input.into_record()?;

        if let Err(err) = self.repo.insert(&record) {
            error!(
                "event=student_add module=service status=error id={} error={err}",
                record.id
            );
            return Err(err.into());
        }
        info!(
            "event=student_add module=service status=ok id={}",
            record.id
        );

        self.repo
            .get(&record.id)?
            .ok_or(ServiceError::InconsistentState(
                "created student not found in read-back",
            ))
    }

    /// Removes one student by id.
    ///
    /// # Contract
    /// - Validates id format only.
    /// - A missing record is an error, not a silent no-op.
    pub fn remove_student(&mut self, id: &str) -> Result<(), ServiceError> {
        if !valid_id(id) {
            return Err(StudentValidationError::Id.into());
        }

        if let Err(err) = self.repo.delete(id) {
            error!("event=student_remove module=service status=error id={id} error={err}");
            return Err(err.into());
        }
        info!("event=student_remove module=service status=ok id={id}");

        Ok(())
    }

    /// Updates the supplied fields of one student.
    ///
    /// # Contract
    /// - Requires an existing record before any field is validated.
    /// - Validates supplied fields in order name, age, course, email,
    ///   failing fast; unsupplied fields keep their stored values.
    /// - A conflicting email is rejected unless it belongs to this record.
    /// - An all-absent patch fails with "no fields to update".
    pub fn update_student(
        &mut self,
        id: &str,
        patch: &StudentPatch,
    ) -> Result<StudentRecord, ServiceError> {
        if !valid_id(id) {
            return Err(StudentValidationError::Id.into());
        }
        if !self.repo.exists(id)? {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        let fields = build_field_set(patch)?;
        if fields.is_empty() {
            return Err(ServiceError::NoFieldsToUpdate);
        }

        if let Err(err) = self.repo.update_fields(id, &fields) {
            error!("event=student_update module=service status=error id={id} error={err}");
            return Err(err.into());
        }
        info!("event=student_update module=service status=ok id={id}");

        self.repo.get(id)?.ok_or(ServiceError::InconsistentState(
            "updated student not found in read-back",
        ))
    }

    /// Case-insensitive substring search over id, name and course.
    ///
    /// An empty keyword matches every record. Results are ordered by
    /// ascending id.
    pub fn search_students(&self, keyword: &str) -> Result<Vec<StudentRecord>, ServiceError> {
        Ok(self.repo.search(keyword)?)
    }

    /// Returns every record ordered by ascending id.
    pub fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError> {
        Ok(self.repo.list_all()?)
    }
}

/// Validates supplied patch fields in entry order and builds the typed
/// column assignments. Absent fields stay absent.
fn build_field_set(patch: &StudentPatch) -> Result<StudentFieldSet, StudentValidationError> {
    let mut fields = StudentFieldSet::default();

    if let Some(name) = patch.name.as_deref() {
        if !valid_name(name) {
            return Err(StudentValidationError::Name);
        }
        fields.name = Some(name.trim().to_string());
    }
    if let Some(age) = patch.age.as_deref() {
        if !valid_age(age) {
            return Err(StudentValidationError::Age);
        }
        fields.age = Some(age.parse().map_err(|_| StudentValidationError::Age)?);
    }
    if let Some(course) = patch.course.as_deref() {
        if !valid_course(course) {
            return Err(StudentValidationError::Course);
        }
        fields.course = Some(course.trim().to_string());
    }
    if let Some(email) = patch.email.as_deref() {
        if !valid_email(email) {
            return Err(StudentValidationError::Email);
        }
        fields.email = Some(email.trim().to_string());
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::build_field_set;
    use crate::model::student::{StudentPatch, StudentValidationError};

    #[test]
    fn build_field_set_keeps_absent_fields_absent() {
        let patch = StudentPatch {
            course: Some("CS".to_string()),
            ..StudentPatch::default()
        };

        let fields = build_field_set(&patch).unwrap();
        assert_eq!(fields.course.as_deref(), Some("CS"));
        assert!(fields.name.is_none());
        assert!(fields.age.is_none());
        assert!(fields.email.is_none());
    }

    #[test]
    fn build_field_set_fails_fast_in_field_order() {
        let patch = StudentPatch {
            age: Some("-3".to_string()),
            email: Some("broken".to_string()),
            ..StudentPatch::default()
        };

        let err = build_field_set(&patch).unwrap_err();
        assert_eq!(err, StudentValidationError::Age);
    }

    #[test]
    fn build_field_set_trims_supplied_text_fields() {
        let patch = StudentPatch {
            name: Some(" Grace Hopper ".to_string()),
            email: Some("grace@navy.mil\t".to_string()),
            ..StudentPatch::default()
        };

        let fields = build_field_set(&patch).unwrap();
        assert_eq!(fields.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(fields.email.as_deref(), Some("grace@navy.mil"));
    }
}
