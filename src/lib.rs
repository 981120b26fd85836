//! A single-machine, offline election library.
//!
//! `ballotbox` authenticates voters and an administrator, lets the admin
//! manage a candidate roster and the voter register, lets each voter cast
//! exactly one vote, and reports tallies. State lives in a local SQLite
//! file; the intended caller is a desktop display layer on the same
//! machine.
//!
//! The rules the crate exists to enforce:
//!
//! - a voter must authenticate before voting;
//! - a voter votes at most once, enforced against the persisted
//!   `has_voted` flag inside a single transaction, never against session
//!   state;
//! - a vote always targets a candidate that exists at insert time;
//! - vote counts and turnout are derived consistently from stored state.
//!
//! Ballots are anonymous by omission: a vote row records the candidate and
//! a timestamp, never the voter.
//!
//! # Security notes
//!
//! A default administrator (`admin` / `admin123`) is seeded the first time
//! a database is opened. This mirrors the historical behaviour of the
//! system; change the account before running a real election. Passwords
//! are stored as salted argon2 hashes.
//!
//! # Example
//!
//! ```no_run
//! use ballotbox::{BallotBox, Config};
//! use ballotbox::model::{NewCandidate, NewVoter};
//!
//! # fn main() -> ballotbox::Result<()> {
//! let mut ballot_box = BallotBox::open(Config::new("election.db"))?;
//!
//! let admin = ballot_box.login_admin("admin", "admin123")?;
//! let candidate = ballot_box.add_candidate(
//!     &admin,
//!     &NewCandidate {
//!         name: "Jane Doe".into(),
//!         party: Some("Unity Party".into()),
//!         description: None,
//!     },
//! )?;
//! ballot_box.register_voter(
//!     &admin,
//!     &NewVoter {
//!         voter_id: "V001".into(),
//!         name: "Ada Lovelace".into(),
//!         password: "correct-horse".into(),
//!     },
//! )?;
//!
//! let (voter, _name) = ballot_box.login_voter("V001", "correct-horse")?;
//! ballot_box.cast_vote(&voter, candidate.candidate_id)?;
//!
//! println!("{}", ballot_box.export_summary(&admin)?);
//! # Ok(())
//! # }
//! ```

mod ballotbox;

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod store;
pub mod validate;

pub use ballotbox::BallotBox;
pub use config::Config;
pub use error::{Error, Result};
pub use model::Session;
pub use report::{CandidateTally, Statistics};
