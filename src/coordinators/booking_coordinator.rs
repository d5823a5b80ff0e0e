use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::{InternalError, SchedulerError};
use crate::stores::{AppointmentLedger, AvailabilityLedger, VaccineInventory};

/// Outcome of a successful reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub appointment_id: i64,
    pub caregiver_username: String,
}

/// BookingCoordinator orchestrates a reservation across the availability
/// ledger, the vaccine inventory, and the appointment ledger
///
/// This is the only component with cross-entity invariants to enforce, so
/// the whole flow runs under one database transaction: caregiver selection,
/// stock check, the slot flip, and the appointment append succeed or fail
/// together. Two concurrent reservations can never bind the same
/// (date, caregiver) pair or observe a stale dose count.
pub struct BookingCoordinator {
    db: DatabaseConnection,
    availability_ledger: Arc<AvailabilityLedger>,
    vaccine_inventory: Arc<VaccineInventory>,
    appointment_ledger: Arc<AppointmentLedger>,
}

impl BookingCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            availability_ledger: Arc::clone(&app_data.availability_ledger),
            vaccine_inventory: Arc::clone(&app_data.vaccine_inventory),
            appointment_ledger: Arc::clone(&app_data.appointment_ledger),
        }
    }

    /// Reserve an appointment for a patient
    ///
    /// Binds the lexicographically smallest caregiver available on `date`,
    /// checks the vaccine has stock, flips the caregiver's slot to
    /// unavailable, and appends the appointment record.
    ///
    /// Date syntax and the patient role are the caller's responsibility; a
    /// malformed date never reaches this method.
    ///
    /// # Returns
    /// * `Ok(Reservation)` - Assigned appointment id and bound caregiver
    /// * `Err(SchedulerError::NoCaregiverAvailable)` - Nobody available on the date
    /// * `Err(SchedulerError::UnknownVaccine)` - No vaccine with that name
    /// * `Err(SchedulerError::OutOfStock)` - Vaccine exists with zero doses
    pub async fn reserve(
        &self,
        date: NaiveDate,
        vaccine_name: &str,
        patient_username: &str,
    ) -> Result<Reservation, SchedulerError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| InternalError::TransactionBegin { source })?;

        // Deterministic tie-break: alphabetically smallest username
        let caregiver = self
            .availability_ledger
            .find_available(&txn, date)
            .await?
            .into_iter()
            .next()
            .ok_or(SchedulerError::NoCaregiverAvailable)?;

        let vaccine = self
            .vaccine_inventory
            .get(&txn, vaccine_name)
            .await?
            .ok_or(SchedulerError::UnknownVaccine)?;

        // Any count >= 1 suffices; the booking gates on stock but does not
        // consume a dose. add_doses is the only dose mutation.
        if vaccine.doses == 0 {
            return Err(SchedulerError::OutOfStock);
        }

        self.availability_ledger
            .mark_unavailable(&txn, &caregiver, date)
            .await?;

        let appointment_id = self
            .appointment_ledger
            .append(&txn, date, patient_username, &caregiver, vaccine_name)
            .await?;

        txn.commit()
            .await
            .map_err(|source| InternalError::TransactionCommit { source })?;

        tracing::info!(
            appointment_id,
            caregiver = %caregiver,
            date = %date,
            vaccine = %vaccine_name,
            "reservation booked"
        );

        Ok(Reservation {
            appointment_id,
            caregiver_username: caregiver,
        })
    }
}
