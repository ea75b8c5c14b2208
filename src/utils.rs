use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand_core::OsRng;
use serde::{Deserialize, Deserializer};

use crate::errors::{AppError, AppResult};

const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::internal(format!("failed to hash password: {err}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|err| AppError::internal(format!("invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// `hash_password` on the blocking pool.
pub async fn hash_password_blocking(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AppError::internal(format!("password hashing task failed: {err}")))?
}

/// `verify_password` on the blocking pool.
pub async fn verify_password_blocking(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|err| AppError::internal(format!("password verification task failed: {err}")))?
}

/// Run one verification against a throwaway hash, for lookups that found no account.
pub async fn verify_password_decoy(password: &str) -> AppResult<()> {
    static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DECOY_HASH.get_or_init(|| hash_password("decoy-account-password").ok()) {
            let _ = verify_password(&password, hash);
        }
    })
    .await
    .map_err(|err| AppError::internal(format!("password verification task failed: {err}")))
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Deserializer for merge-patch fields: absent -> `None`, `null` -> `Some(None)`.
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a merge-patch value onto a nullable field.
pub fn patch_nullable<T>(field: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        breed: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"breed": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"breed": "Beagle"}"#).unwrap();

        assert_eq!(absent.breed, None);
        assert_eq!(null.breed, Some(None));
        assert_eq!(set.breed, Some(Some("Beagle".to_string())));
    }

    #[test]
    fn patch_nullable_leaves_absent_untouched() {
        let mut breed = Some("Beagle".to_string());
        patch_nullable(&mut breed, None);
        assert_eq!(breed.as_deref(), Some("Beagle"));
        patch_nullable(&mut breed, Some(None));
        assert_eq!(breed, None);
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(matches!(hash_password("short"), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn blocking_wrappers_match_inline_hashing() {
        let hash = hash_password_blocking("correct horse").await.unwrap();
        assert!(verify_password_blocking("correct horse", &hash).await.unwrap());
        assert!(!verify_password_blocking("wrong horse!", &hash).await.unwrap());
        assert!(matches!(
            hash_password_blocking("short").await,
            Err(AppError::BadRequest(_))
        ));
        verify_password_decoy("anything at all").await.unwrap();
    }

    #[test]
    fn verifies_hashed_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse!", &hash).unwrap());
    }
}
