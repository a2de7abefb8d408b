/// Password hashing module using Argon2id
///
/// Stored credentials are PHC strings: algorithm, parameters, a random
/// 16-byte salt and the hash itself. Hashing the same password twice yields
/// different strings, and each one verifies against the original password.
///
/// # Parameters
///
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("longenough1")?;
///
/// assert!(verify_password("longenough1", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored credential is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are rejected or
/// hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored credential
///
/// Parameters are read back from the PHC string, so credentials hashed with
/// older parameters keep verifying.
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't.
///
/// # Errors
///
/// Returns an error if the stored credential can't be parsed or verification
/// fails for a reason other than a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash(
            "Hash is missing its salt or output".to_string(),
        ));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Well-formed credential no password matches, using the same parameters as
/// [`hash_password`]
const DUMMY_HASH: &str = "$argon2id$v=19$m=65536,t=3,p=4$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Runs a full verification that always fails
///
/// Login calls this when no account matches the email so that the response
/// takes as long as a wrong password would.
pub fn verify_dummy(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}
