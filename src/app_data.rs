use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::stores::{AppointmentLedger, AvailabilityLedger, CredentialStore, VaccineInventory};

/// Centralized application data following the main-owned stores pattern
///
/// All stores are created once and shared across the CLI handlers and the
/// booking coordinator. Stores are stateless; every operation takes a
/// connection, which lets the coordinator pass a transaction where the
/// multi-write booking sequence needs one.
pub struct AppData {
    pub db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub vaccine_inventory: Arc<VaccineInventory>,
    pub availability_ledger: Arc<AvailabilityLedger>,
    pub appointment_ledger: Arc<AppointmentLedger>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection should be initialized and migrated before
    /// calling this.
    pub fn init(db: DatabaseConnection) -> Self {
        tracing::debug!("Creating stores...");

        let credential_store = Arc::new(CredentialStore::new());
        let vaccine_inventory = Arc::new(VaccineInventory::new());
        let availability_ledger = Arc::new(AvailabilityLedger::new());
        let appointment_ledger = Arc::new(AppointmentLedger::new());

        tracing::debug!("Stores created");

        Self {
            db,
            credential_store,
            vaccine_inventory,
            availability_ledger,
            appointment_ledger,
        }
    }
}
