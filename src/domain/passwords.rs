// src/domain/passwords.rs
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;

/// Hash a password with a fresh random salt using the OS RNG.
/// This is what the account routes should call.
pub fn hash_password_default(password: &str) -> Vec<u8> {
    let mut rng = OsRng;
    hash_password(&mut rng, password)
}

/// Hash a password with a caller-supplied RNG.
/// Stored layout: 16 salt bytes followed by SHA-256(salt || password).
pub fn hash_password<R: RngCore>(rng: &mut R, password: &str) -> Vec<u8> {
    let mut salt = [0u8; SALT_BYTES];
    rng.fill_bytes(&mut salt);

    let mut out = Vec::with_capacity(SALT_BYTES + 32);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&digest(&salt, password));
    out
}

/// Check a password attempt against a stored hash blob.
pub fn verify_password(stored: &[u8], attempt: &str) -> bool {
    if stored.len() != SALT_BYTES + 32 {
        return false;
    }
    let (salt, hash) = stored.split_at(SALT_BYTES);
    hashes_equal(hash, &digest(salt, attempt))
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Compare hash blobs without short-circuiting on the first mismatch.
fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
