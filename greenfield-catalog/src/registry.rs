use chrono::NaiveDate;
use greenfield_core::{CoreError, CoreResult};
use std::sync::Arc;
use tracing::{debug, info};

use crate::pricing::{quote, SlotQuote};
use crate::repository::SlotRepository;
use crate::slot::Slot;

/// Availability bookkeeping over generated slots.
pub struct SlotRegistry {
    slots: Arc<dyn SlotRepository>,
}

impl SlotRegistry {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    pub async fn list_slots(&self, turf_id: &str, date: NaiveDate) -> CoreResult<Vec<Slot>> {
        self.slots.list_for(turf_id, date).await
    }

    pub async fn get_slot(&self, slot_id: &str) -> CoreResult<Slot> {
        self.slots
            .get(slot_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Slot not found".to_string()))
    }

    /// Claim-if-available over the whole selection. Unknown ids are skipped;
    /// a selection containing an already claimed slot is refused as a whole.
    pub async fn claim(&self, slot_ids: &[String]) -> CoreResult<Vec<String>> {
        let claimed = self.slots.claim_available(slot_ids).await.map_err(|e| {
            debug!("Claim refused: {}", e);
            match e {
                CoreError::Conflict(_) => CoreError::Conflict(
                    "One or more selected slots are no longer available".to_string(),
                ),
                other => other,
            }
        })?;
        if claimed.len() != slot_ids.len() {
            debug!("Skipped {} unknown slot ids", slot_ids.len() - claimed.len());
        }
        info!("Claimed {} slots", claimed.len());
        Ok(claimed)
    }

    pub async fn release(&self, slot_ids: &[String]) -> CoreResult<Vec<String>> {
        let released = self.slots.release(slot_ids).await?;
        info!("Released {} slots", released.len());
        Ok(released)
    }

    /// Price of a selection as the stored slots see it.
    pub async fn quote(&self, slot_ids: &[String]) -> CoreResult<SlotQuote> {
        let slots = self.slots.get_many(slot_ids).await?;
        Ok(quote(slot_ids, &slots))
    }

    /// Adds slots for a turf; ids that already exist are left untouched.
    pub async fn register(&self, slots: Vec<Slot>) -> CoreResult<()> {
        self.slots.insert_many(slots).await
    }
}
