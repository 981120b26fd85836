use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the recent-votes feed: a cast ballot joined with the info
/// of the candidate it was for.
///
/// Ballots carry no voter reference, so this is as much as the system can
/// ever say about a single vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentVote {
    pub cast_at: DateTime<Utc>,
    pub candidate_name: String,
    pub party: Option<String>,
}
