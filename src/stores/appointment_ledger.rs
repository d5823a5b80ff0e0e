use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::{InternalError, SchedulerError};
use crate::types::db::appointment::{self, Entity as Appointment};
use crate::types::db::appointment_counter::{self, Entity as AppointmentCounter};

/// AppointmentLedger manages booked appointment records and their ids
///
/// Ids come from the appointment_counter singleton row, read and bumped in
/// `append`. The counter read-then-write is not safe for naive concurrent
/// callers: `append` must run on a transaction connection so the increment
/// serializes with the insert.
pub struct AppointmentLedger {}

impl AppointmentLedger {
    pub fn new() -> Self {
        Self {}
    }

    /// Current number of appointment records
    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, SchedulerError> {
        Appointment::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_appointments", e).into())
    }

    /// Append a new appointment record and return its assigned id
    ///
    /// With no deletion path the sequence stays zero-based and gap-free, so
    /// the id always equals the record count at call time.
    pub async fn append(
        &self,
        conn: &impl ConnectionTrait,
        date: NaiveDate,
        patient_username: &str,
        caregiver_username: &str,
        vaccine_name: &str,
    ) -> Result<i64, SchedulerError> {
        let counter = AppointmentCounter::find_by_id(1)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_appointment_counter", e))?
            .ok_or(InternalError::MissingSingleton {
                table: "appointment_counter",
            })?;

        let id = counter.next_id;

        let new_appointment = appointment::ActiveModel {
            id: Set(id),
            date: Set(date),
            patient_username: Set(patient_username.to_string()),
            caregiver_username: Set(caregiver_username.to_string()),
            vaccine_name: Set(vaccine_name.to_string()),
        };

        new_appointment
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_appointment", e))?;

        let mut active: appointment_counter::ActiveModel = counter.into();
        active.next_id = Set(id + 1);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("bump_appointment_counter", e))?;

        Ok(id)
    }

    /// All appointments bound to a caregiver, ascending id
    pub async fn list_for_caregiver(
        &self,
        conn: &impl ConnectionTrait,
        caregiver_username: &str,
    ) -> Result<Vec<appointment::Model>, SchedulerError> {
        Appointment::find()
            .filter(appointment::Column::CaregiverUsername.eq(caregiver_username))
            .order_by_asc(appointment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_appointments_for_caregiver", e).into())
    }

    /// All appointments booked by a patient, ascending id
    pub async fn list_for_patient(
        &self,
        conn: &impl ConnectionTrait,
        patient_username: &str,
    ) -> Result<Vec<appointment::Model>, SchedulerError> {
        Appointment::find()
            .filter(appointment::Column::PatientUsername.eq(patient_username))
            .order_by_asc(appointment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_appointments_for_patient", e).into())
    }
}

impl std::fmt::Debug for AppointmentLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppointmentLedger").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    use crate::stores::CredentialStore;

    async fn setup_test_db() -> (DatabaseConnection, AppointmentLedger) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credentials = CredentialStore::new();
        for patient in ["bob", "carol"] {
            credentials
                .create_patient(&db, patient, "password")
                .await
                .expect("Failed to create patient");
        }
        for caregiver in ["alice", "dan"] {
            credentials
                .create_caregiver(&db, caregiver, "password")
                .await
                .expect("Failed to create caregiver");
        }

        (db, AppointmentLedger::new())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_count_starts_at_zero() {
        let (db, ledger) = setup_test_db().await;

        assert_eq!(ledger.count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_assigns_contiguous_zero_based_ids() {
        let (db, ledger) = setup_test_db().await;
        let d = date("2024-05-01");

        let first = ledger.append(&db, d, "bob", "alice", "Pfizer").await.unwrap();
        let second = ledger.append(&db, d, "carol", "dan", "Pfizer").await.unwrap();
        let third = ledger.append(&db, d, "bob", "dan", "Moderna").await.unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(third, 2);
        assert_eq!(ledger.count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_id_equals_count_before_append() {
        let (db, ledger) = setup_test_db().await;
        let d = date("2024-05-01");

        for _ in 0..3 {
            let before = ledger.count(&db).await.unwrap();
            let id = ledger.append(&db, d, "bob", "alice", "Pfizer").await.unwrap();
            assert_eq!(id as u64, before);
        }
    }

    #[tokio::test]
    async fn test_listings_filter_and_order() {
        let (db, ledger) = setup_test_db().await;
        let d = date("2024-05-01");

        ledger.append(&db, d, "bob", "alice", "Pfizer").await.unwrap();
        ledger.append(&db, d, "carol", "alice", "Pfizer").await.unwrap();
        ledger.append(&db, d, "bob", "dan", "Moderna").await.unwrap();

        let for_bob = ledger.list_for_patient(&db, "bob").await.unwrap();
        assert_eq!(
            for_bob.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(for_bob.iter().all(|a| a.patient_username == "bob"));

        let for_alice = ledger.list_for_caregiver(&db, "alice").await.unwrap();
        assert_eq!(
            for_alice.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert!(for_alice.iter().all(|a| a.caregiver_username == "alice"));
    }

    #[tokio::test]
    async fn test_listing_for_unknown_user_is_empty() {
        let (db, ledger) = setup_test_db().await;

        assert!(ledger.list_for_patient(&db, "nobody").await.unwrap().is_empty());
        assert!(ledger
            .list_for_caregiver(&db, "nobody")
            .await
            .unwrap()
            .is_empty());
    }
}
