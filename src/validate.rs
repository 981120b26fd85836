//! Stateless input validation, callable regardless of session.
//!
//! The mutating operations call these inline, but they are also exposed so
//! a display layer can pre-check form fields before submitting.

use crate::error::{Error, Result};

/// Voter IDs are at least 3 characters of letters, digits, hyphens, or
/// underscores.
pub fn voter_id(voter_id: &str) -> Result<()> {
    if voter_id.trim().is_empty() {
        return Err(Error::BadRequest("Voter ID cannot be empty".into()));
    }
    if voter_id.chars().count() < 3 {
        return Err(Error::BadRequest(
            "Voter ID must be at least 3 characters long".into(),
        ));
    }
    if !voter_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::BadRequest(
            "Voter ID can only contain letters, numbers, hyphens, and underscores".into(),
        ));
    }
    Ok(())
}

/// Passwords are at least 4 characters.
pub fn password(password: &str) -> Result<()> {
    if password.chars().count() < 4 {
        return Err(Error::BadRequest(
            "Password must be at least 4 characters long".into(),
        ));
    }
    Ok(())
}

/// Candidate names are at least 2 characters once trimmed.
pub fn candidate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::BadRequest("Candidate name cannot be empty".into()));
    }
    if trimmed.chars().count() < 2 {
        return Err(Error::BadRequest(
            "Candidate name must be at least 2 characters long".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voter_ids() {
        assert!(voter_id("V001").is_ok());
        assert!(voter_id("ada_lovelace-1815").is_ok());
        assert!(voter_id("ab").is_err());
        assert!(voter_id("").is_err());
        assert!(voter_id("   ").is_err());
        assert!(voter_id("no spaces").is_err());
        assert!(voter_id("nope!").is_err());
    }

    #[test]
    fn passwords() {
        assert!(password("abcd").is_ok());
        assert!(password("abc").is_err());
        assert!(password("").is_err());
    }

    #[test]
    fn candidate_names() {
        assert!(candidate_name("Jo").is_ok());
        assert!(candidate_name("  Jane Doe  ").is_ok());
        assert!(candidate_name("J").is_err());
        assert!(candidate_name(" J ").is_err());
        assert!(candidate_name("").is_err());
        assert!(candidate_name("   ").is_err());
    }
}
