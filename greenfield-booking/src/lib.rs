pub mod models;
pub mod repository;
pub mod memory;
pub mod ledger;
pub mod orchestrator;
pub mod finance;

#[cfg(test)]
mod testing;

pub use models::{Booking, BookingPaymentStatus, BookingStatus, Payment, PaymentMethod, PaymentStatus};
pub use ledger::BookingLedger;
pub use orchestrator::PaymentTracker;
pub use finance::{AdminAggregator, DashboardStats};
