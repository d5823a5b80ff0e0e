use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use crate::errors::{InternalError, SchedulerError};
use crate::types::db::vaccine::{self, Entity as Vaccine};

/// VaccineInventory manages the vaccine name -> remaining dose count mapping
///
/// There is no decrease operation at this layer: the booking flow checks the
/// count but does not consume doses, and add_doses only ever adds.
pub struct VaccineInventory {}

impl VaccineInventory {
    pub fn new() -> Self {
        Self {}
    }

    /// Exact-match lookup; absence is not an error
    pub async fn get(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<vaccine::Model>, SchedulerError> {
        Vaccine::find_by_id(name)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_vaccine", e).into())
    }

    /// List all known vaccines, ordered by name ascending
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<vaccine::Model>, SchedulerError> {
        Vaccine::find()
            .order_by_asc(vaccine::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_vaccines", e).into())
    }

    /// Create a vaccine with an initial dose count
    ///
    /// # Returns
    /// * `Ok(())` - Vaccine created
    /// * `Err(SchedulerError::InvalidArgument)` - Negative initial count, or the name already exists
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        initial_doses: i64,
    ) -> Result<(), SchedulerError> {
        if initial_doses < 0 {
            return Err(SchedulerError::InvalidArgument);
        }

        if self.get(conn, name).await?.is_some() {
            return Err(SchedulerError::InvalidArgument);
        }

        let new_vaccine = vaccine::ActiveModel {
            name: Set(name.to_string()),
            doses: Set(initial_doses),
        };

        new_vaccine
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_vaccine", e))?;

        Ok(())
    }

    /// Add doses to an existing vaccine
    ///
    /// # Arguments
    /// * `name` - The vaccine to update
    /// * `amount` - Number of doses to add; must be positive
    ///
    /// # Returns
    /// * `Ok(())` - Dose count increased and persisted
    /// * `Err(SchedulerError::InvalidArgument)` - Non-positive amount
    /// * `Err(SchedulerError::NotFound)` - No vaccine with that name
    pub async fn increase(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        amount: i64,
    ) -> Result<(), SchedulerError> {
        if amount <= 0 {
            return Err(SchedulerError::InvalidArgument);
        }

        let existing = self
            .get(conn, name)
            .await?
            .ok_or_else(|| SchedulerError::NotFound(format!("vaccine {}", name)))?;

        let doses = existing.doses + amount;
        let mut active: vaccine::ActiveModel = existing.into();
        active.doses = Set(doses);

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_vaccine_doses", e))?;

        Ok(())
    }
}

impl std::fmt::Debug for VaccineInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaccineInventory").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> (DatabaseConnection, VaccineInventory) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        (db, VaccineInventory::new())
    }

    #[tokio::test]
    async fn test_get_missing_vaccine_returns_none() {
        let (db, inventory) = setup_test_db().await;

        let result = inventory.get(&db, "Moderna").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (db, inventory) = setup_test_db().await;

        inventory
            .create(&db, "Pfizer", 5)
            .await
            .expect("Failed to create vaccine");

        let vaccine = inventory.get(&db, "Pfizer").await.unwrap().unwrap();
        assert_eq!(vaccine.name, "Pfizer");
        assert_eq!(vaccine.doses, 5);
    }

    #[tokio::test]
    async fn test_create_duplicate_name_rejected() {
        let (db, inventory) = setup_test_db().await;

        inventory.create(&db, "Pfizer", 5).await.unwrap();

        let result = inventory.create(&db, "Pfizer", 3).await;
        assert!(matches!(result, Err(SchedulerError::InvalidArgument)));
    }

    #[tokio::test]
    async fn test_create_negative_initial_doses_rejected() {
        let (db, inventory) = setup_test_db().await;

        let result = inventory.create(&db, "Pfizer", -1).await;
        assert!(matches!(result, Err(SchedulerError::InvalidArgument)));
    }

    #[tokio::test]
    async fn test_increase_is_additive() {
        let (db, inventory) = setup_test_db().await;

        inventory.create(&db, "Moderna", 2).await.unwrap();
        inventory.increase(&db, "Moderna", 3).await.unwrap();
        inventory.increase(&db, "Moderna", 4).await.unwrap();

        let vaccine = inventory.get(&db, "Moderna").await.unwrap().unwrap();
        assert_eq!(vaccine.doses, 9);
    }

    #[tokio::test]
    async fn test_increase_rejects_non_positive_amount() {
        let (db, inventory) = setup_test_db().await;

        inventory.create(&db, "Moderna", 2).await.unwrap();

        let result = inventory.increase(&db, "Moderna", 0).await;
        assert!(matches!(result, Err(SchedulerError::InvalidArgument)));

        let result = inventory.increase(&db, "Moderna", -5).await;
        assert!(matches!(result, Err(SchedulerError::InvalidArgument)));
    }

    #[tokio::test]
    async fn test_increase_missing_vaccine_is_not_found() {
        let (db, inventory) = setup_test_db().await;

        let result = inventory.increase(&db, "Novavax", 3).await;
        assert!(matches!(result, Err(SchedulerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let (db, inventory) = setup_test_db().await;

        inventory.create(&db, "Pfizer", 5).await.unwrap();
        inventory.create(&db, "Moderna", 2).await.unwrap();

        let names: Vec<String> = inventory
            .list(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Moderna", "Pfizer"]);
    }
}
