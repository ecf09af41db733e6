use rand::Rng;
use sha2::Sha256;

const PBKDF2_ROUNDS: u32 = 10_000;

/// Generate a random hex salt for a new account.
pub fn new_salt() -> String {
    let salt: [u8; 16] = rand::thread_rng().gen();
    hex::encode(salt)
}

/// Generate a random hex session token.
pub fn new_token() -> String {
    let token: [u8; 16] = rand::thread_rng().gen();
    hex::encode(token)
}

/// hash_password derives a key from the password and the account salt
/// using pbkdf2_hmac with sha256 and returns its hexdigest.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut key = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut key,
    );
    hex::encode(key)
}

/// Check a password against the stored salt and digest.
pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    hash_password(password, salt) == hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("hunter2", "00112233445566778899aabbccddeeff");
        assert_eq!(hash.len(), 64);
        // Same input, same digest
        assert_eq!(
            hash,
            hash_password("hunter2", "00112233445566778899aabbccddeeff")
        );
        // Different salt, different digest
        assert_ne!(
            hash,
            hash_password("hunter2", "ffeeddccbbaa99887766554433221100")
        );
    }

    #[test]
    fn test_verify_password() {
        let salt = new_salt();
        let hash = hash_password("segredo", &salt);
        assert!(verify_password("segredo", &salt, &hash));
        assert!(!verify_password("segred0", &salt, &hash));
    }

    #[test]
    fn test_new_salt_is_unique() {
        assert_ne!(new_salt(), new_salt());
        assert_eq!(new_salt().len(), 32);
    }
}
