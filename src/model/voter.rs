use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A voter registration request. The password is in plaintext here and is
/// hashed before it reaches the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoter {
    pub voter_id: String,
    pub name: String,
    pub password: String,
}

/// A registered voter, as stored in the database.
///
/// The password hash is deliberately absent: authentication happens inside
/// the store, and nothing above it needs the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub voter_id: String,
    pub name: String,
    /// Live eligibility flag: flips false to true exactly once, as part of
    /// the same transaction that records the vote.
    pub has_voted: bool,
    pub registered_at: DateTime<Utc>,
}
