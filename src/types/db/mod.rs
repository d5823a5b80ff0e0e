pub mod appointment;
pub mod appointment_counter;
pub mod availability;
pub mod caregiver;
pub mod patient;
pub mod vaccine;
