//! Derived views over the stored votes: ranked results, the statistics
//! bundle, and the exportable text summary.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One row of the ranked results: a candidate and its vote count.
/// Result sets are ordered by count, descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub candidate_id: i64,
    pub name: String,
    pub party: Option<String>,
    pub votes: u64,
}

/// Aggregate election statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_voters: u64,
    pub total_candidates: u64,
    pub total_votes: u64,
    pub voters_who_voted: u64,
    /// Percentage of registered voters who have voted; 0.0 when nobody is
    /// registered.
    pub turnout_percent: f64,
}

impl Statistics {
    pub(crate) fn turnout_percent(voters_who_voted: u64, total_voters: u64) -> f64 {
        if total_voters == 0 {
            0.0
        } else {
            voters_who_voted as f64 / total_voters as f64 * 100.0
        }
    }
}

/// Render the fixed-format results summary.
///
/// The layout is part of the export contract: a 50-character rule around
/// the title, a statistics block, then one line per ranked candidate with
/// its vote share (of at least one, so an empty election shows 0.0% rather
/// than dividing by zero) to one decimal place.
pub(crate) fn render_summary(
    results: &[CandidateTally],
    stats: &Statistics,
    generated_at: DateTime<Local>,
) -> String {
    let mut lines = Vec::new();

    lines.push("=".repeat(50));
    lines.push("VOTING RESULTS SUMMARY".to_string());
    lines.push("=".repeat(50));
    lines.push(format!(
        "Generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());

    lines.push("STATISTICS:".to_string());
    lines.push(format!("Total Registered Voters: {}", stats.total_voters));
    lines.push(format!("Total Candidates: {}", stats.total_candidates));
    lines.push(format!("Total Votes Cast: {}", stats.total_votes));
    lines.push(format!("Voter Turnout: {:.1}%", stats.turnout_percent));
    lines.push(String::new());

    lines.push("RESULTS:".to_string());
    lines.push("-".repeat(30));
    for (rank, entry) in results.iter().enumerate() {
        let party = entry
            .party
            .as_deref()
            .filter(|party| !party.is_empty())
            .map(|party| format!(" ({party})"))
            .unwrap_or_default();
        let share = entry.votes as f64 / stats.total_votes.max(1) as f64 * 100.0;
        lines.push(format!(
            "{}. {}{party}: {} votes ({share:.1}%)",
            rank + 1,
            entry.name,
            entry.votes,
        ));
    }
    lines.push("=".repeat(50));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn stats() -> Statistics {
        Statistics {
            total_voters: 4,
            total_candidates: 2,
            total_votes: 3,
            voters_who_voted: 3,
            turnout_percent: Statistics::turnout_percent(3, 4),
        }
    }

    #[test]
    fn turnout_is_zero_without_voters() {
        assert_eq!(Statistics::turnout_percent(0, 0), 0.0);
    }

    #[test]
    fn turnout_is_one_hundred_when_everyone_voted() {
        assert_eq!(Statistics::turnout_percent(5, 5), 100.0);
    }

    #[test]
    fn summary_layout() {
        let results = vec![
            CandidateTally {
                candidate_id: 1,
                name: "Jane Doe".into(),
                party: Some("Unity Party".into()),
                votes: 2,
            },
            CandidateTally {
                candidate_id: 2,
                name: "John Smith".into(),
                party: None,
                votes: 1,
            },
        ];
        let generated_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let summary = render_summary(&results, &stats(), generated_at);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "VOTING RESULTS SUMMARY");
        assert_eq!(lines[3], "Generated on: 2024-05-01 09:30:00");
        assert!(summary.contains("Total Registered Voters: 4"));
        assert!(summary.contains("Total Votes Cast: 3"));
        assert!(summary.contains("Voter Turnout: 75.0%"));
        assert!(summary.contains("1. Jane Doe (Unity Party): 2 votes (66.7%)"));
        assert!(summary.contains("2. John Smith: 1 votes (33.3%)"));
        assert_eq!(lines.last().unwrap(), &"=".repeat(50).as_str());
    }

    #[test]
    fn summary_of_empty_election_has_no_result_lines() {
        let stats = Statistics {
            total_voters: 0,
            total_candidates: 0,
            total_votes: 0,
            voters_who_voted: 0,
            turnout_percent: Statistics::turnout_percent(0, 0),
        };
        let summary = render_summary(&[], &stats, Local::now());
        assert!(summary.contains("Voter Turnout: 0.0%"));
        assert!(summary.contains("RESULTS:"));
        assert!(!summary.contains("1. "));
    }
}
