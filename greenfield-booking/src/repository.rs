use async_trait::async_trait;
use greenfield_core::CoreResult;

use crate::models::{Booking, Payment};

/// In-place edit applied under the repository's write lock. Returning an
/// error aborts the edit and leaves the record untouched.
pub type BookingMutation = Box<dyn FnOnce(&mut Booking) -> CoreResult<()> + Send>;

pub type PaymentMutation = Box<dyn FnOnce(&mut Payment) -> CoreResult<()> + Send>;

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: Booking) -> CoreResult<()>;

    async fn get(&self, id: &str) -> CoreResult<Option<Booking>>;

    /// Every booking, oldest first.
    async fn list(&self) -> CoreResult<Vec<Booking>>;

    /// Bookings owned by one account, oldest first.
    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Booking>>;

    /// Applies `mutation` atomically and returns the stored result.
    /// `NotFound` when the id is unknown.
    async fn update(&self, id: &str, mutation: BookingMutation) -> CoreResult<Booking>;

    async fn count(&self) -> CoreResult<usize>;
}

/// Repository trait for payment data access
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: Payment) -> CoreResult<()>;

    async fn get(&self, id: &str) -> CoreResult<Option<Payment>>;

    /// The first payment recorded for `booking_id` by `user_id`.
    async fn find_by_booking(&self, booking_id: &str, user_id: &str) -> CoreResult<Option<Payment>>;

    /// Applies `mutation` atomically and returns the stored result.
    /// `NotFound` when the id is unknown.
    async fn update(&self, id: &str, mutation: PaymentMutation) -> CoreResult<Payment>;
}
