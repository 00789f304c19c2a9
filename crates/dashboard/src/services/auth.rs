//! Seller sign-in.
//!
//! Verifies the submitted email and password against the configured seller
//! account. The password is stored only as an Argon2 hash.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sellah_core::{Email, EmailError};
use thiserror::Error;

use crate::config::SellerAccountConfig;

/// Errors that can occur during sign-in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted email is not an address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}

/// Verifies seller credentials.
pub struct SellerAuthenticator<'a> {
    account: &'a SellerAccountConfig,
}

impl<'a> SellerAuthenticator<'a> {
    #[must_use]
    pub const fn new(account: &'a SellerAccountConfig) -> Self {
        Self { account }
    }

    /// Check an email/password pair.
    ///
    /// The password is verified even when the email does not match, so both
    /// failures take the same time.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::InvalidCredentials` for any mismatch.
    pub fn verify(&self, email: &str, password: &str) -> Result<Email, AuthError> {
        let email = Email::parse(email)?;
        let password_ok =
            verify_password(password, self.account.password_hash.expose_secret()).is_ok();

        if password_ok && email == self.account.email {
            Ok(email)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
