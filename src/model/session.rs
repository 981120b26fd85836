use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The authenticated identity of the current caller.
///
/// Sessions are plain values handed out by the login operations and passed
/// back to every guarded operation; there is no ambient "current user"
/// state, so multiple sessions can coexist. Logging out is a value
/// transition back to [`Session::Anonymous`] and always succeeds.
///
/// Note that a voter session outliving a successful vote cast is fine: the
/// eligibility check always consults the persisted `has_voted` flag, never
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Session {
    Anonymous,
    Voter { voter_id: String },
    Admin { admin_id: String },
}

impl Session {
    /// Explicit logout, from any state.
    pub fn logout(self) -> Session {
        Session::Anonymous
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin { .. })
    }

    /// Who is logged in, for display layers.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Voter { voter_id } => Some(voter_id),
            Session::Admin { admin_id } => Some(admin_id),
        }
    }

    /// Gate an admin-only operation.
    pub(crate) fn require_admin(&self, action: &str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{action} requires admin access"
            )))
        }
    }

    /// Gate a voter-only operation, yielding the voter's ID.
    pub(crate) fn require_voter(&self) -> Result<&str> {
        match self {
            Session::Voter { voter_id } => Ok(voter_id),
            _ => Err(Error::NotAuthenticated(
                "please log in as a voter first".into(),
            )),
        }
    }
}
