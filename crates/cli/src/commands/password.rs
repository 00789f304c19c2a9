//! Password hashing command.

use std::io::BufRead;

use secrecy::{ExposeSecret, SecretString};

use super::CommandError;

/// Read the first line of `input` as the password.
///
/// # Errors
///
/// Returns an error if reading fails or the line is empty.
pub fn read_password(mut input: impl BufRead) -> Result<SecretString, CommandError> {
    let mut line = String::new();
    input.read_line(&mut line)?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CommandError::EmptyPassword);
    }
    Ok(SecretString::from(password.to_string()))
}

/// Argon2 PHC string for `password`.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash(password: &SecretString) -> Result<String, CommandError> {
    tracing::info!("hashing seller password");
    sellah_dashboard::services::hash_password(password.expose_secret()).map_err(CommandError::from)
}
