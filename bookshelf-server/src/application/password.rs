use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::domain::error::DomainError;

// argon2id with m=19 MiB, t=2, p=1; the stand-in below must use the same cost
const MEMORY_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

/// Verified against when the email is unknown so both login failures cost the same.
pub(crate) const STAND_IN_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

fn hasher() -> Result<Argon2<'static>, DomainError> {
    Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map(|params| Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
        .map_err(unexpected)
}

fn unexpected(err: impl std::fmt::Display) -> DomainError {
    DomainError::Unexpected(err.to_string())
}

/// Produces a PHC string with a fresh random salt.
pub(crate) fn hash(raw: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(raw.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(unexpected)
}

/// `InvalidCredentials` on mismatch; a malformed stored hash is `Unexpected`.
pub(crate) fn verify(raw: &str, phc: &str) -> Result<(), DomainError> {
    let stored = PasswordHash::new(phc).map_err(unexpected)?;
    match hasher()?.verify_password(raw.as_bytes(), &stored) {
        Ok(()) => Ok(()),
        Err(PasswordHashError::Password) => Err(DomainError::InvalidCredentials),
        Err(err) => Err(unexpected(err)),
    }
}

/// Spends one verification on [`STAND_IN_HASH`]. Only a broken hasher surfaces.
pub(crate) fn verify_stand_in(raw: &str) -> Result<(), DomainError> {
    match verify(raw, STAND_IN_HASH) {
        Ok(()) | Err(DomainError::InvalidCredentials) => Ok(()),
        Err(err) => Err(err),
    }
}
