//! The session-checked operation surface of the election system.
//!
//! Every operation takes the caller's [`Session`] explicitly (or hands one
//! back, for the logins). Role checks happen here; eligibility checks
//! happen against the persisted state inside the store, so a stale session
//! can never be used to vote twice.

use chrono::Local;
use log::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Candidate, NewCandidate, NewVoter, RecentVote, Session, Voter};
use crate::report::{render_summary, CandidateTally, Statistics};
use crate::store::Store;
use crate::validate;

/// The election system: a persistence store plus the session and
/// eligibility rules that guard it.
pub struct BallotBox {
    store: Store,
    config: Config,
}

impl BallotBox {
    /// Open the election database named by the config, creating the schema
    /// and seeding the default admin on first use.
    pub fn open(config: Config) -> Result<Self> {
        let store = Store::open(config.db_path())?;
        Ok(Self { store, config })
    }

    /// An in-memory election, for tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
            config: Config::default(),
        })
    }

    // Sessions

    /// Log a voter in. Succeeds only if the credentials match and the
    /// voter has not yet voted; on success, returns the voter session and
    /// the voter's display name.
    ///
    /// A voter who has already voted is refused with
    /// [`Error::AlreadyVoted`], which still carries their name so the
    /// display layer can greet them while turning them away.
    pub fn login_voter(&self, voter_id: &str, password: &str) -> Result<(Session, String)> {
        let Some(voter) = self.store.authenticate_voter(voter_id, password)? else {
            warn!("Rejected voter login for '{voter_id}'");
            return Err(Error::NotFound("Invalid voter ID or password".into()));
        };
        if voter.has_voted {
            return Err(Error::AlreadyVoted {
                voter_name: voter.name,
            });
        }
        info!("Voter '{voter_id}' logged in");
        Ok((
            Session::Voter {
                voter_id: voter.voter_id,
            },
            voter.name,
        ))
    }

    /// Log an admin in. No session is established and nothing changes on
    /// failure.
    pub fn login_admin(&self, admin_id: &str, password: &str) -> Result<Session> {
        let Some(admin) = self.store.authenticate_admin(admin_id, password)? else {
            warn!("Rejected admin login for '{admin_id}'");
            return Err(Error::NotFound("Invalid admin credentials".into()));
        };
        info!("Admin '{}' logged in", admin.admin_id);
        Ok(Session::Admin {
            admin_id: admin.admin_id,
        })
    }

    // Voting

    /// Cast the calling voter's one vote for the given candidate.
    ///
    /// Eligibility is re-verified against the persisted `has_voted` flag
    /// inside the store's transaction, not against the session: a session
    /// that has already been used to vote stays valid for browsing but any
    /// further cast fails with [`Error::AlreadyVoted`].
    pub fn cast_vote(&mut self, session: &Session, candidate_id: i64) -> Result<()> {
        let voter_id = session.require_voter()?;
        self.store.cast_vote(voter_id, candidate_id)
    }

    /// The current candidate roster. Callable from any session, since
    /// voters need it to fill in their ballot.
    pub fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.store.list_candidates()
    }

    // Admin-only operations

    /// Register a new voter. Voter ID and password are validated inline.
    pub fn register_voter(&self, session: &Session, new: &NewVoter) -> Result<()> {
        session.require_admin("registering voters")?;
        validate::voter_id(&new.voter_id)?;
        validate::password(&new.password)?;
        self.store.register_voter(new)
    }

    /// Add a candidate to the roster, returning it with its assigned ID.
    pub fn add_candidate(&self, session: &Session, new: &NewCandidate) -> Result<Candidate> {
        session.require_admin("adding candidates")?;
        validate::candidate_name(&new.name)?;
        self.store.add_candidate(new)
    }

    /// Remove a candidate and all votes cast for it.
    pub fn remove_candidate(&mut self, session: &Session, candidate_id: i64) -> Result<()> {
        session.require_admin("removing candidates")?;
        if !self.store.remove_candidate(candidate_id)? {
            return Err(Error::NotFound(format!(
                "no candidate with ID {candidate_id}"
            )));
        }
        Ok(())
    }

    pub fn list_voters(&self, session: &Session) -> Result<Vec<Voter>> {
        session.require_admin("listing voters")?;
        self.store.list_voters()
    }

    /// Ranked results, descending by vote count.
    pub fn results(&self, session: &Session) -> Result<Vec<CandidateTally>> {
        session.require_admin("viewing results")?;
        self.store.tally()
    }

    pub fn statistics(&self, session: &Session) -> Result<Statistics> {
        session.require_admin("viewing statistics")?;
        self.gather_statistics()
    }

    /// The most recent votes, newest first. Falls back to the configured
    /// limit when the caller does not give one.
    pub fn recent_votes(&self, session: &Session, limit: Option<u32>) -> Result<Vec<RecentVote>> {
        session.require_admin("viewing recent votes")?;
        self.store
            .recent_votes(limit.unwrap_or(self.config.recent_votes_limit()))
    }

    /// A formatted text summary of results and statistics, for export.
    pub fn export_summary(&self, session: &Session) -> Result<String> {
        session.require_admin("exporting results")?;
        let results = self.store.tally()?;
        let stats = self.gather_statistics()?;
        Ok(render_summary(&results, &stats, Local::now()))
    }

    fn gather_statistics(&self) -> Result<Statistics> {
        let (total_voters, voters_who_voted) = self.store.voter_counts()?;
        Ok(Statistics {
            total_voters,
            total_candidates: self.store.total_candidates()?,
            total_votes: self.store.total_votes()?,
            voters_who_voted,
            turnout_percent: Statistics::turnout_percent(voters_who_voted, total_voters),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::admin::{DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD};
    use crate::model::AdminCredentials;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn admin_session(ballot_box: &BallotBox) -> Session {
        let creds = AdminCredentials::example();
        ballot_box
            .login_admin(&creds.admin_id, &creds.password)
            .unwrap()
    }

    /// An election with voters V001..V003 and two candidates, returning
    /// the candidate IDs of (X, Y).
    fn seeded() -> (BallotBox, Session, i64, i64) {
        init_logging();
        let ballot_box = BallotBox::open_in_memory().unwrap();
        let admin = admin_session(&ballot_box);
        for voter in [NewVoter::example(), NewVoter::example2(), NewVoter::example3()] {
            ballot_box.register_voter(&admin, &voter).unwrap();
        }
        let x = ballot_box
            .add_candidate(&admin, &NewCandidate::example())
            .unwrap();
        let y = ballot_box
            .add_candidate(&admin, &NewCandidate::example2())
            .unwrap();
        (ballot_box, admin, x.candidate_id, y.candidate_id)
    }

    fn voter_login(ballot_box: &BallotBox, new: &NewVoter) -> Session {
        let (session, name) = ballot_box.login_voter(&new.voter_id, &new.password).unwrap();
        assert_eq!(&name, &new.name);
        session
    }

    #[test]
    fn full_election_scenario() {
        let (mut ballot_box, admin, x, y) = seeded();

        for (voter, choice) in [
            (NewVoter::example(), x),
            (NewVoter::example2(), y),
            (NewVoter::example3(), x),
        ] {
            let session = voter_login(&ballot_box, &voter);
            ballot_box.cast_vote(&session, choice).unwrap();
        }

        let results = ballot_box.results(&admin).unwrap();
        assert_eq!((results[0].candidate_id, results[0].votes), (x, 2));
        assert_eq!((results[1].candidate_id, results[1].votes), (y, 1));

        let stats = ballot_box.statistics(&admin).unwrap();
        assert_eq!(stats.total_votes, 3);
        assert_eq!(stats.voters_who_voted, 3);
        assert_eq!(stats.turnout_percent, 100.0);

        let summary = ballot_box.export_summary(&admin).unwrap();
        assert!(summary.contains("VOTING RESULTS SUMMARY"));
        assert!(summary.contains("Total Votes Cast: 3"));
        assert!(summary.contains("Voter Turnout: 100.0%"));
        assert!(summary.contains("1. Jane Doe (Unity Party): 2 votes (66.7%)"));
    }

    #[test]
    fn admin_login_with_wrong_password_has_no_side_effects() {
        init_logging();
        let ballot_box = BallotBox::open_in_memory().unwrap();
        let err = ballot_box
            .login_admin(DEFAULT_ADMIN_ID, "not-the-password")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        // No session was established, so nothing admin-gated works.
        assert!(matches!(
            ballot_box.statistics(&Session::Anonymous),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn voter_cannot_log_back_in_after_voting() {
        let (mut ballot_box, _admin, x, _y) = seeded();
        let voter = NewVoter::example();

        let session = voter_login(&ballot_box, &voter);
        ballot_box.cast_vote(&session, x).unwrap();

        // Logout, then try to come back with the same credentials.
        let _ = session.logout();
        let err = ballot_box
            .login_voter(&voter.voter_id, &voter.password)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyVoted { ref voter_name } if voter_name == &voter.name));
    }

    #[test]
    fn stale_voter_session_cannot_vote_twice() {
        let (mut ballot_box, _admin, x, y) = seeded();
        let session = voter_login(&ballot_box, &NewVoter::example());

        ballot_box.cast_vote(&session, x).unwrap();
        // The session value is unchanged, but the persisted flag wins.
        let err = ballot_box.cast_vote(&session, y).unwrap_err();
        assert!(matches!(err, Error::AlreadyVoted { .. }));

        let admin = admin_session(&ballot_box);
        assert_eq!(ballot_box.statistics(&admin).unwrap().total_votes, 1);
    }

    #[test]
    fn voting_requires_a_voter_session() {
        let (mut ballot_box, admin, x, _y) = seeded();
        assert!(matches!(
            ballot_box.cast_vote(&Session::Anonymous, x),
            Err(Error::NotAuthenticated(_))
        ));
        assert!(matches!(
            ballot_box.cast_vote(&admin, x),
            Err(Error::NotAuthenticated(_))
        ));
    }

    #[test]
    fn admin_operations_are_gated_per_session() {
        let (mut ballot_box, _admin, x, _y) = seeded();
        let voter = voter_login(&ballot_box, &NewVoter::example());

        for session in [Session::Anonymous, voter] {
            assert!(matches!(
                ballot_box.register_voter(&session, &NewVoter::example()),
                Err(Error::PermissionDenied(_))
            ));
            assert!(matches!(
                ballot_box.add_candidate(&session, &NewCandidate::example()),
                Err(Error::PermissionDenied(_))
            ));
            assert!(matches!(
                ballot_box.remove_candidate(&session, x),
                Err(Error::PermissionDenied(_))
            ));
            assert!(matches!(
                ballot_box.list_voters(&session),
                Err(Error::PermissionDenied(_))
            ));
            assert!(matches!(
                ballot_box.results(&session),
                Err(Error::PermissionDenied(_))
            ));
            assert!(matches!(
                ballot_box.recent_votes(&session, None),
                Err(Error::PermissionDenied(_))
            ));
            assert!(matches!(
                ballot_box.export_summary(&session),
                Err(Error::PermissionDenied(_))
            ));
        }

        // The roster itself is public.
        assert_eq!(ballot_box.list_candidates().unwrap().len(), 2);
    }

    #[test]
    fn registration_validates_inline() {
        let (ballot_box, admin, _x, _y) = seeded();

        let short_id = NewVoter {
            voter_id: "ab".into(),
            ..NewVoter::example()
        };
        assert!(matches!(
            ballot_box.register_voter(&admin, &short_id),
            Err(Error::BadRequest(_))
        ));

        let weak_password = NewVoter {
            voter_id: "V999".into(),
            password: "abc".into(),
            ..NewVoter::example()
        };
        assert!(matches!(
            ballot_box.register_voter(&admin, &weak_password),
            Err(Error::BadRequest(_))
        ));

        assert!(matches!(
            ballot_box.add_candidate(
                &admin,
                &NewCandidate {
                    name: " J ".into(),
                    party: None,
                    description: None,
                },
            ),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn removing_a_candidate_adjusts_totals() {
        let (mut ballot_box, admin, x, y) = seeded();
        for (voter, choice) in [
            (NewVoter::example(), x),
            (NewVoter::example2(), x),
            (NewVoter::example3(), y),
        ] {
            let session = voter_login(&ballot_box, &voter);
            ballot_box.cast_vote(&session, choice).unwrap();
        }

        ballot_box.remove_candidate(&admin, x).unwrap();
        let stats = ballot_box.statistics(&admin).unwrap();
        // X's two votes went with it; turnout is untouched.
        assert_eq!(stats.total_votes, 1);
        assert_eq!(stats.voters_who_voted, 3);

        let err = ballot_box.remove_candidate(&admin, x).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn recent_votes_respect_the_configured_default_limit() {
        let (mut ballot_box, admin, x, _y) = seeded();
        let session = voter_login(&ballot_box, &NewVoter::example());
        ballot_box.cast_vote(&session, x).unwrap();

        let recent = ballot_box.recent_votes(&admin, None).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].candidate_name, "Jane Doe");

        assert!(ballot_box.recent_votes(&admin, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn statistics_on_an_empty_election() {
        init_logging();
        let ballot_box = BallotBox::open_in_memory().unwrap();
        let admin = admin_session(&ballot_box);
        let stats = ballot_box.statistics(&admin).unwrap();
        assert_eq!(stats.total_voters, 0);
        assert_eq!(stats.turnout_percent, 0.0);
    }

    #[test]
    fn default_admin_credentials_work_until_changed() {
        init_logging();
        let ballot_box = BallotBox::open_in_memory().unwrap();
        let session = ballot_box
            .login_admin(DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD)
            .unwrap();
        assert!(session.is_admin());
        assert_eq!(session.user_id(), Some(DEFAULT_ADMIN_ID));
    }
}
