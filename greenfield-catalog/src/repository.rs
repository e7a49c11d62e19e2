use async_trait::async_trait;
use chrono::NaiveDate;
use greenfield_core::CoreResult;

use crate::slot::Slot;
use crate::turf::Turf;

/// Repository trait for turf listings
#[async_trait]
pub trait TurfRepository: Send + Sync {
    /// All turfs in insertion order.
    async fn list(&self) -> CoreResult<Vec<Turf>>;

    async fn get(&self, id: &str) -> CoreResult<Option<Turf>>;

    async fn insert(&self, turf: Turf) -> CoreResult<()>;

    /// Replaces a stored turf. Returns false when the id is unknown.
    async fn update(&self, turf: Turf) -> CoreResult<bool>;

    /// Returns false when the id is unknown.
    async fn delete(&self, id: &str) -> CoreResult<bool>;

    async fn count(&self) -> CoreResult<usize>;
}

/// Repository trait for generated slots
#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn insert_many(&self, slots: Vec<Slot>) -> CoreResult<()>;

    /// Slots of one turf on one day, in window order.
    async fn list_for(&self, turf_id: &str, date: NaiveDate) -> CoreResult<Vec<Slot>>;

    async fn get(&self, id: &str) -> CoreResult<Option<Slot>>;

    /// The stored slots among `ids`; unknown ids are left out.
    async fn get_many(&self, ids: &[String]) -> CoreResult<Vec<Slot>>;

    /// Atomically marks every known id unavailable. If any known slot is
    /// already unavailable nothing changes and the call fails with `Conflict`.
    /// Unknown ids are skipped. Returns the ids that were claimed.
    async fn claim_available(&self, ids: &[String]) -> CoreResult<Vec<String>>;

    /// Marks every known id available again; unknown ids are skipped.
    /// Returns the ids that were released.
    async fn release(&self, ids: &[String]) -> CoreResult<Vec<String>>;
}
