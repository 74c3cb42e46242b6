//! Upload-token gate consumed by the HTTP layer for mutating endpoints.

use sha2::{Digest, Sha256};

/// Whether a presented token matches the configured secret.
///
/// Fails closed: no configured secret means nothing matches. Both sides are
/// hashed before comparison so the check runs over fixed-length digests
/// whose equality test does not depend on how much of the token matches.
pub fn token_matches(configured: Option<&str>, presented: Option<&str>) -> bool {
    let Some(secret) = configured else {
        return false;
    };
    let expected = Sha256::digest(secret.as_bytes());
    let received = Sha256::digest(presented.unwrap_or("").as_bytes());
    expected == received
}
