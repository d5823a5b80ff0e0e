pub mod booking_coordinator;

pub use booking_coordinator::{BookingCoordinator, Reservation};
