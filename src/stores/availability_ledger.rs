use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::{InternalError, SchedulerError};
use crate::types::db::availability::{self, Entity as Availability};

/// AvailabilityLedger manages (date, caregiver) slots and their binary flag
pub struct AvailabilityLedger {}

impl AvailabilityLedger {
    pub fn new() -> Self {
        Self {}
    }

    /// Publish availability for a caregiver on a date
    ///
    /// Idempotent per (date, caregiver): re-publishing an existing slot
    /// leaves one row with the flag true, including a slot a reservation has
    /// already consumed.
    pub async fn publish(
        &self,
        conn: &impl ConnectionTrait,
        caregiver_username: &str,
        date: NaiveDate,
    ) -> Result<(), SchedulerError> {
        let existing = Availability::find_by_id((date, caregiver_username.to_string()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_availability", e))?;

        match existing {
            Some(slot) => {
                if !slot.available {
                    let mut active: availability::ActiveModel = slot.into();
                    active.available = Set(true);
                    active
                        .update(conn)
                        .await
                        .map_err(|e| InternalError::database("republish_availability", e))?;
                }
            }
            None => {
                let new_slot = availability::ActiveModel {
                    date: Set(date),
                    caregiver_username: Set(caregiver_username.to_string()),
                    available: Set(true),
                };
                new_slot
                    .insert(conn)
                    .await
                    .map_err(|e| InternalError::database("insert_availability", e))?;
            }
        }

        Ok(())
    }

    /// Caregivers with an available slot on the date, ordered
    /// lexicographically by username ascending
    ///
    /// Empty vector, not an error, when nobody is available.
    pub async fn find_available(
        &self,
        conn: &impl ConnectionTrait,
        date: NaiveDate,
    ) -> Result<Vec<String>, SchedulerError> {
        let slots = Availability::find()
            .filter(availability::Column::Date.eq(date))
            .filter(availability::Column::Available.eq(true))
            .order_by_asc(availability::Column::CaregiverUsername)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_available_caregivers", e))?;

        Ok(slots.into_iter().map(|s| s.caregiver_username).collect())
    }

    /// Flip a slot's flag to false
    ///
    /// # Returns
    /// * `Ok(())` - Slot marked unavailable
    /// * `Err(SchedulerError::NotFound)` - No such slot, or it is already false;
    ///   callers must check availability before calling
    pub async fn mark_unavailable(
        &self,
        conn: &impl ConnectionTrait,
        caregiver_username: &str,
        date: NaiveDate,
    ) -> Result<(), SchedulerError> {
        let slot = Availability::find_by_id((date, caregiver_username.to_string()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_availability", e))?
            .ok_or_else(|| {
                SchedulerError::NotFound(format!("availability {} {}", date, caregiver_username))
            })?;

        if !slot.available {
            return Err(SchedulerError::NotFound(format!(
                "availability {} {}",
                date, caregiver_username
            )));
        }

        let mut active: availability::ActiveModel = slot.into();
        active.available = Set(false);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_unavailable", e))?;

        Ok(())
    }
}

impl std::fmt::Debug for AvailabilityLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityLedger").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    use crate::stores::CredentialStore;

    async fn setup_test_db() -> (DatabaseConnection, AvailabilityLedger) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        (db, AvailabilityLedger::new())
    }

    async fn add_caregiver(db: &DatabaseConnection, username: &str) {
        CredentialStore::new()
            .create_caregiver(db, username, "password")
            .await
            .expect("Failed to create caregiver");
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_find_available_orders_lexicographically() {
        let (db, ledger) = setup_test_db().await;
        add_caregiver(&db, "zoe").await;
        add_caregiver(&db, "amy").await;

        let d = date("2024-05-01");
        ledger.publish(&db, "zoe", d).await.unwrap();
        ledger.publish(&db, "amy", d).await.unwrap();

        let available = ledger.find_available(&db, d).await.unwrap();
        assert_eq!(available, vec!["amy", "zoe"]);
    }

    #[tokio::test]
    async fn test_find_available_empty_when_nobody_published() {
        let (db, ledger) = setup_test_db().await;

        let available = ledger.find_available(&db, date("2024-05-01")).await.unwrap();
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn test_publish_is_idempotent() {
        let (db, ledger) = setup_test_db().await;
        add_caregiver(&db, "alice").await;

        let d = date("2024-05-01");
        ledger.publish(&db, "alice", d).await.unwrap();
        ledger.publish(&db, "alice", d).await.unwrap();

        let available = ledger.find_available(&db, d).await.unwrap();
        assert_eq!(available, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_mark_unavailable_hides_caregiver() {
        let (db, ledger) = setup_test_db().await;
        add_caregiver(&db, "alice").await;

        let d = date("2024-05-01");
        ledger.publish(&db, "alice", d).await.unwrap();
        ledger.mark_unavailable(&db, "alice", d).await.unwrap();

        let available = ledger.find_available(&db, d).await.unwrap();
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn test_mark_unavailable_twice_is_not_found() {
        let (db, ledger) = setup_test_db().await;
        add_caregiver(&db, "alice").await;

        let d = date("2024-05-01");
        ledger.publish(&db, "alice", d).await.unwrap();
        ledger.mark_unavailable(&db, "alice", d).await.unwrap();

        let result = ledger.mark_unavailable(&db, "alice", d).await;
        assert!(matches!(result, Err(SchedulerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_unavailable_missing_slot_is_not_found() {
        let (db, ledger) = setup_test_db().await;

        let result = ledger
            .mark_unavailable(&db, "nobody", date("2024-05-01"))
            .await;
        assert!(matches!(result, Err(SchedulerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_republish_after_booking_restores_flag() {
        let (db, ledger) = setup_test_db().await;
        add_caregiver(&db, "alice").await;

        let d = date("2024-05-01");
        ledger.publish(&db, "alice", d).await.unwrap();
        ledger.mark_unavailable(&db, "alice", d).await.unwrap();
        ledger.publish(&db, "alice", d).await.unwrap();

        let available = ledger.find_available(&db, d).await.unwrap();
        assert_eq!(available, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_dates_are_independent() {
        let (db, ledger) = setup_test_db().await;
        add_caregiver(&db, "alice").await;

        ledger.publish(&db, "alice", date("2024-05-01")).await.unwrap();
        ledger.publish(&db, "alice", date("2024-05-02")).await.unwrap();
        ledger
            .mark_unavailable(&db, "alice", date("2024-05-01"))
            .await
            .unwrap();

        assert!(ledger
            .find_available(&db, date("2024-05-01"))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            ledger.find_available(&db, date("2024-05-02")).await.unwrap(),
            vec!["alice"]
        );
    }
}
