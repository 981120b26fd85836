use serde::{Deserialize, Serialize};

use crate::error::Result;

/// ID of the administrator account seeded on first open.
pub const DEFAULT_ADMIN_ID: &str = "admin";

/// Well-known placeholder password for the seeded administrator.
///
/// This mirrors the historical behaviour of the system and is deliberately
/// not hidden: deployments must change it before opening the polls.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Display name of the seeded administrator.
pub const DEFAULT_ADMIN_NAME: &str = "System Administrator";

/// Core admin user data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub admin_id: String,
    pub name: String,
    pub password_hash: String,
}

impl Admin {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> Result<bool> {
        Ok(argon2::verify_encoded(
            &self.password_hash,
            password.as_ref(),
        )?)
    }
}

/// Raw admin credentials, received from a user. These are never stored
/// directly, since the password is in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub admin_id: String,
    pub password: String,
}
