use rand::Rng;

use crate::error::Result;

pub mod admin;
pub mod candidate;
pub mod session;
pub mod vote;
pub mod voter;

pub use admin::{Admin, AdminCredentials};
pub use candidate::{Candidate, NewCandidate};
pub use session::Session;
pub use vote::RecentVote;
pub use voter::{NewVoter, Voter};

/// Hash a plaintext password for storage.
///
/// Plaintext passwords never reach the database; they are hashed here and
/// compared via `argon2::verify_encoded` on authentication.
pub(crate) fn hash_password(password: &str) -> Result<String> {
    // 16 bytes is the recommended salt length for argon2:
    //  https://en.wikipedia.org/wiki/Argon2
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill(&mut salt);
    let hash = argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())?;
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();
        // Fresh salt every time, so equal passwords hash differently.
        assert_ne!(first, second);
        assert!(argon2::verify_encoded(&first, b"hunter22").unwrap());
        assert!(argon2::verify_encoded(&second, b"hunter22").unwrap());
        assert!(!argon2::verify_encoded(&first, b"hunter23").unwrap());
    }
}
