use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use crate::errors::{InternalError, SchedulerError};
use crate::types::db::caregiver::{self, Entity as Caregiver};
use crate::types::db::patient::{self, Entity as Patient};

/// CredentialStore manages patient and caregiver accounts
///
/// The two roles live in separate tables with independent username
/// namespaces: the same username may exist as both a patient and a
/// caregiver. Passwords are stored as Argon2id PHC strings with a
/// per-account random salt.
pub struct CredentialStore {}

impl CredentialStore {
    pub fn new() -> Self {
        Self {}
    }

    fn hash_password(password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))
    }

    fn verify_hash(password: &str, stored_hash: &str) -> bool {
        PasswordHash::new(stored_hash)
            .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
            .is_ok()
    }

    /// Check whether a patient account with this username exists
    pub async fn patient_exists(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<bool, SchedulerError> {
        let existing = Patient::find_by_id(username)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_patient", e))?;

        Ok(existing.is_some())
    }

    /// Check whether a caregiver account with this username exists
    pub async fn caregiver_exists(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<bool, SchedulerError> {
        let existing = Caregiver::find_by_id(username)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_caregiver", e))?;

        Ok(existing.is_some())
    }

    /// Create a new patient account
    ///
    /// # Arguments
    /// * `username` - The username for the new patient
    /// * `password` - The plaintext password to hash and store
    ///
    /// # Returns
    /// * `Ok(())` - Account created
    /// * `Err(SchedulerError::DuplicateUsername)` - Username taken in the patient namespace
    pub async fn create_patient(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<(), SchedulerError> {
        if self.patient_exists(conn, username).await? {
            return Err(SchedulerError::DuplicateUsername);
        }

        let new_patient = patient::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(Self::hash_password(password)?),
            created_at: Set(Utc::now().timestamp()),
        };

        new_patient.insert(conn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                SchedulerError::DuplicateUsername
            } else {
                InternalError::database("insert_patient", e).into()
            }
        })?;

        Ok(())
    }

    /// Create a new caregiver account
    ///
    /// # Arguments
    /// * `username` - The username for the new caregiver
    /// * `password` - The plaintext password to hash and store
    ///
    /// # Returns
    /// * `Ok(())` - Account created
    /// * `Err(SchedulerError::DuplicateUsername)` - Username taken in the caregiver namespace
    pub async fn create_caregiver(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<(), SchedulerError> {
        if self.caregiver_exists(conn, username).await? {
            return Err(SchedulerError::DuplicateUsername);
        }

        let new_caregiver = caregiver::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(Self::hash_password(password)?),
            created_at: Set(Utc::now().timestamp()),
        };

        new_caregiver.insert(conn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                SchedulerError::DuplicateUsername
            } else {
                InternalError::database("insert_caregiver", e).into()
            }
        })?;

        Ok(())
    }

    /// Verify patient credentials
    ///
    /// A missing account and a wrong password both report
    /// `InvalidCredentials`; callers cannot tell the two apart.
    pub async fn verify_patient(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<(), SchedulerError> {
        let account = Patient::find_by_id(username)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_patient", e))?
            .ok_or(SchedulerError::InvalidCredentials)?;

        if !Self::verify_hash(password, &account.password_hash) {
            return Err(SchedulerError::InvalidCredentials);
        }

        Ok(())
    }

    /// Verify caregiver credentials
    pub async fn verify_caregiver(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<(), SchedulerError> {
        let account = Caregiver::find_by_id(username)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_caregiver", e))?
            .ok_or(SchedulerError::InvalidCredentials)?;

        if !Self::verify_hash(password, &account.password_hash) {
            return Err(SchedulerError::InvalidCredentials);
        }

        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish()
    }
}
