use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candidate details supplied by an admin when adding to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    pub name: String,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A candidate from the database, with its system-assigned ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: i64,
    #[serde(flatten)]
    pub details: NewCandidate,
    pub added_at: DateTime<Utc>,
}

impl Deref for Candidate {
    type Target = NewCandidate;

    fn deref(&self) -> &Self::Target {
        &self.details
    }
}
