//! Payload-level validation for the company aggregate.
//!
//! These checks apply to a single submission, before any database lookups:
//! department names and user emails must be unique within the payload (both
//! case-insensitively), and each solutions engineer may appear only once.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

/// Cross-field validation failures in a company submission.
///
/// The display strings are user-facing and rendered verbatim by the portals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompanyPayloadError {
    /// Two departments in the payload share a name.
    #[error("Department names must be unique")]
    DuplicateDepartmentNames,

    /// Two users in the payload share an email address.
    #[error("User email addresses must be unique")]
    DuplicateUserEmails,

    /// The same solutions engineer appears twice.
    #[error("Each Solutions Engineer can only be assigned once")]
    DuplicateSolutionsEngineers,
}

/// Normalizes an email for comparison and storage.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks that department names are unique within the payload,
/// case-insensitively.
pub fn validate_department_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), CompanyPayloadError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.trim().to_lowercase()) {
            return Err(CompanyPayloadError::DuplicateDepartmentNames);
        }
    }
    Ok(())
}

/// Checks that user emails are unique within the payload, case-insensitively.
pub fn validate_user_emails<'a>(
    emails: impl IntoIterator<Item = &'a str>,
) -> Result<(), CompanyPayloadError> {
    let mut seen = HashSet::new();
    for email in emails {
        if !seen.insert(normalize_email(email)) {
            return Err(CompanyPayloadError::DuplicateUserEmails);
        }
    }
    Ok(())
}

/// Checks that each solutions engineer is assigned at most once.
pub fn validate_se_user_ids(
    user_ids: impl IntoIterator<Item = Uuid>,
) -> Result<(), CompanyPayloadError> {
    let mut seen = HashSet::new();
    for id in user_ids {
        if !seen.insert(id) {
            return Err(CompanyPayloadError::DuplicateSolutionsEngineers);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_names_case_insensitive() {
        let err = validate_department_names(["Eng", "eng"]).unwrap_err();
        assert_eq!(err, CompanyPayloadError::DuplicateDepartmentNames);
        assert_eq!(err.to_string(), "Department names must be unique");
    }

    #[test]
    fn test_distinct_department_names_pass() {
        assert!(validate_department_names(["Eng", "Ops", "Finance"]).is_ok());
    }

    #[test]
    fn test_duplicate_emails_rejected() {
        let err =
            validate_user_emails(["a@example.com", "A@Example.com"]).unwrap_err();
        assert_eq!(err, CompanyPayloadError::DuplicateUserEmails);
        assert_eq!(err.to_string(), "User email addresses must be unique");
    }

    #[test]
    fn test_duplicate_se_rejected() {
        let id = Uuid::new_v4();
        let err = validate_se_user_ids([id, id]).unwrap_err();
        assert_eq!(err, CompanyPayloadError::DuplicateSolutionsEngineers);
        assert_eq!(
            err.to_string(),
            "Each Solutions Engineer can only be assigned once"
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
