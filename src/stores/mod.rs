// Stores layer - Data access and repository pattern
pub mod appointment_ledger;
pub mod availability_ledger;
pub mod credential_store;
pub mod vaccine_inventory;

pub use appointment_ledger::AppointmentLedger;
pub use availability_ledger::AvailabilityLedger;
pub use credential_store::CredentialStore;
pub use vaccine_inventory::VaccineInventory;
