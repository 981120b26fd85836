//! SQLite persistence for the election system.
//!
//! The store owns the schema and all query execution. Everything above it
//! works in terms of the model types; no SQL leaks out of this module.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{is_duplicate_key_error, Error, Result};
use crate::model::admin::{DEFAULT_ADMIN_ID, DEFAULT_ADMIN_NAME, DEFAULT_ADMIN_PASSWORD};
use crate::model::{hash_password, Admin, Candidate, NewCandidate, NewVoter, RecentVote, Voter};
use crate::report::CandidateTally;

/// Schema, created on first open.
///
/// `votes` deliberately has no voter column: ballot anonymity is achieved
/// by omission, so the system can answer "did this voter vote" but never
/// "what did this voter vote for".
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS voters (
    voter_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    has_voted     INTEGER NOT NULL DEFAULT 0,
    registered_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS candidates (
    candidate_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL UNIQUE,
    party        TEXT,
    description  TEXT,
    added_at     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS votes (
    vote_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    candidate_id INTEGER NOT NULL REFERENCES candidates (candidate_id),
    cast_at      TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS admins (
    admin_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL
);
";

/// A handle on the election database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if absent) the election database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        debug!("Opening election store at {}", path.as_ref().display());
        Self::init(Connection::open(path)?)
    }

    /// An in-memory store, for tests and throwaway elections.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        let store = Self { conn };
        store.ensure_admin_exists()?;
        Ok(store)
    }

    /// Seed the default admin account if no admin exists yet.
    ///
    /// This operation is idempotent.
    fn ensure_admin_exists(&self) -> Result<()> {
        let admins: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;
        if admins == 0 {
            let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)?;
            self.conn.execute(
                "INSERT INTO admins (admin_id, name, password_hash) VALUES (?1, ?2, ?3)",
                params![DEFAULT_ADMIN_ID, DEFAULT_ADMIN_NAME, password_hash],
            )?;
            warn!(
                "Seeded default admin '{DEFAULT_ADMIN_ID}' with the well-known default password; \
                 change it before opening the polls"
            );
        }
        Ok(())
    }

    // Voter management

    /// Register a new voter, hashing their password.
    pub fn register_voter(&self, new: &NewVoter) -> Result<()> {
        let password_hash = hash_password(&new.password)?;
        self.conn
            .execute(
                "INSERT INTO voters (voter_id, name, password_hash, has_voted, registered_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![new.voter_id, new.name, password_hash, Utc::now()],
            )
            .map_err(|err| {
                if is_duplicate_key_error(&err) {
                    Error::DuplicateKey(format!(
                        "voter ID '{}' is already registered",
                        new.voter_id
                    ))
                } else {
                    err.into()
                }
            })?;
        info!("Registered voter '{}'", new.voter_id);
        Ok(())
    }

    /// Authenticate a voter. Returns `None` on unknown ID or wrong
    /// password; the caller cannot tell which.
    pub fn authenticate_voter(&self, voter_id: &str, password: &str) -> Result<Option<Voter>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, password_hash, has_voted, registered_at
                 FROM voters WHERE voter_id = ?1",
                params![voter_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, DateTime<Utc>>(3)?,
                    ))
                },
            )
            .optional()?;

        if let Some((name, password_hash, has_voted, registered_at)) = row {
            if argon2::verify_encoded(&password_hash, password.as_bytes())? {
                return Ok(Some(Voter {
                    voter_id: voter_id.to_string(),
                    name,
                    has_voted,
                    registered_at,
                }));
            }
        }
        Ok(None)
    }

    pub fn list_voters(&self) -> Result<Vec<Voter>> {
        let mut stmt = self.conn.prepare(
            "SELECT voter_id, name, has_voted, registered_at FROM voters ORDER BY registered_at",
        )?;
        let voters = stmt
            .query_map([], |row| {
                Ok(Voter {
                    voter_id: row.get(0)?,
                    name: row.get(1)?,
                    has_voted: row.get(2)?,
                    registered_at: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(voters)
    }

    /// `(total registered, have voted)` counts for the statistics bundle.
    pub fn voter_counts(&self) -> Result<(u64, u64)> {
        let counts = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(has_voted), 0) FROM voters",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }

    // Candidate management

    /// Add a candidate to the roster, assigning its ID.
    pub fn add_candidate(&self, new: &NewCandidate) -> Result<Candidate> {
        let added_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO candidates (name, party, description, added_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![new.name, new.party, new.description, added_at],
            )
            .map_err(|err| {
                if is_duplicate_key_error(&err) {
                    Error::DuplicateKey(format!("candidate '{}' already exists", new.name))
                } else {
                    err.into()
                }
            })?;
        let candidate_id = self.conn.last_insert_rowid();
        info!("Added candidate '{}' with ID {candidate_id}", new.name);
        Ok(Candidate {
            candidate_id,
            details: new.clone(),
            added_at,
        })
    }

    pub fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT candidate_id, name, party, description, added_at
             FROM candidates ORDER BY candidate_id",
        )?;
        let candidates = stmt
            .query_map([], |row| {
                Ok(Candidate {
                    candidate_id: row.get(0)?,
                    details: NewCandidate {
                        name: row.get(1)?,
                        party: row.get(2)?,
                        description: row.get(3)?,
                    },
                    added_at: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(candidates)
    }

    /// Remove a candidate and every vote cast for it, in one transaction.
    /// Returns whether a candidate row was actually removed.
    ///
    /// The cascade shrinks historical tallies; see the crate docs for why
    /// this is the intended trade-off.
    pub fn remove_candidate(&mut self, candidate_id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let votes_removed = tx.execute(
            "DELETE FROM votes WHERE candidate_id = ?1",
            params![candidate_id],
        )?;
        let removed = tx.execute(
            "DELETE FROM candidates WHERE candidate_id = ?1",
            params![candidate_id],
        )?;
        tx.commit()?;
        if removed > 0 {
            info!("Removed candidate {candidate_id} and {votes_removed} of its votes");
        }
        Ok(removed > 0)
    }

    // Voting

    /// Record a ballot for `candidate_id` on behalf of `voter_id`.
    ///
    /// The eligibility flip and the vote insert happen in a single
    /// transaction: the flag update is conditional on `has_voted = 0`, so a
    /// ballot is recorded if and only if the voter was still eligible at
    /// commit time. No partial state can survive a failure.
    pub fn cast_vote(&mut self, voter_id: &str, candidate_id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;

        let candidate_exists: u64 = tx.query_row(
            "SELECT COUNT(*) FROM candidates WHERE candidate_id = ?1",
            params![candidate_id],
            |row| row.get(0),
        )?;
        if candidate_exists == 0 {
            return Err(Error::NotFound(format!(
                "no candidate with ID {candidate_id}"
            )));
        }

        let flipped = tx.execute(
            "UPDATE voters SET has_voted = 1 WHERE voter_id = ?1 AND has_voted = 0",
            params![voter_id],
        )?;
        if flipped == 0 {
            // Distinguish an exhausted ballot from an unknown voter.
            let name: Option<String> = tx
                .query_row(
                    "SELECT name FROM voters WHERE voter_id = ?1",
                    params![voter_id],
                    |row| row.get(0),
                )
                .optional()?;
            return match name {
                Some(voter_name) => Err(Error::AlreadyVoted { voter_name }),
                None => Err(Error::NotFound(format!("no voter with ID '{voter_id}'"))),
            };
        }

        tx.execute(
            "INSERT INTO votes (candidate_id, cast_at) VALUES (?1, ?2)",
            params![candidate_id, Utc::now()],
        )?;
        tx.commit()?;
        info!("Recorded ballot for candidate {candidate_id}");
        Ok(())
    }

    // Aggregation

    /// Votes per candidate, descending by count. Candidates with no votes
    /// appear with a count of zero.
    pub fn tally(&self) -> Result<Vec<CandidateTally>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.candidate_id, c.name, c.party, COUNT(v.vote_id) AS votes
             FROM candidates c
             LEFT JOIN votes v ON c.candidate_id = v.candidate_id
             GROUP BY c.candidate_id, c.name, c.party
             ORDER BY votes DESC",
        )?;
        let tallies = stmt
            .query_map([], |row| {
                Ok(CandidateTally {
                    candidate_id: row.get(0)?,
                    name: row.get(1)?,
                    party: row.get(2)?,
                    votes: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tallies)
    }

    pub fn total_votes(&self) -> Result<u64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM votes", [], |row| row.get(0))?;
        Ok(total)
    }

    pub fn total_candidates(&self) -> Result<u64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))?;
        Ok(total)
    }

    /// The most recent votes joined with candidate info, newest first.
    pub fn recent_votes(&self, limit: u32) -> Result<Vec<RecentVote>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.cast_at, c.name, c.party
             FROM votes v
             JOIN candidates c ON v.candidate_id = c.candidate_id
             ORDER BY v.cast_at DESC, v.vote_id DESC
             LIMIT ?1",
        )?;
        let votes = stmt
            .query_map(params![limit], |row| {
                Ok(RecentVote {
                    cast_at: row.get(0)?,
                    candidate_name: row.get(1)?,
                    party: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(votes)
    }

    // Admin authentication

    /// Authenticate an admin. Returns `None` on unknown ID or wrong
    /// password.
    pub fn authenticate_admin(&self, admin_id: &str, password: &str) -> Result<Option<Admin>> {
        let admin = self
            .conn
            .query_row(
                "SELECT admin_id, name, password_hash FROM admins WHERE admin_id = ?1",
                params![admin_id],
                |row| {
                    Ok(Admin {
                        admin_id: row.get(0)?,
                        name: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;

        if let Some(admin) = admin {
            if admin.verify_password(password)? {
                return Ok(Some(admin));
            }
        }
        Ok(None)
    }
}
