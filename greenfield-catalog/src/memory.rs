use async_trait::async_trait;
use chrono::NaiveDate;
use greenfield_core::{CoreError, CoreResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::repository::{SlotRepository, TurfRepository};
use crate::slot::Slot;
use crate::turf::Turf;

/// In-memory turf listing. A `Vec` keeps listing order stable.
#[derive(Default)]
pub struct InMemoryTurfRepository {
    turfs: RwLock<Vec<Turf>>,
}

impl InMemoryTurfRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TurfRepository for InMemoryTurfRepository {
    async fn list(&self) -> CoreResult<Vec<Turf>> {
        Ok(self.turfs.read().await.clone())
    }

    async fn get(&self, id: &str) -> CoreResult<Option<Turf>> {
        Ok(self.turfs.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, turf: Turf) -> CoreResult<()> {
        let mut turfs = self.turfs.write().await;
        if turfs.iter().any(|t| t.id == turf.id) {
            return Err(CoreError::Conflict(format!("Turf {} already exists", turf.id)));
        }
        turfs.push(turf);
        Ok(())
    }

    async fn update(&self, turf: Turf) -> CoreResult<bool> {
        let mut turfs = self.turfs.write().await;
        match turfs.iter_mut().find(|t| t.id == turf.id) {
            Some(existing) => {
                *existing = turf;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        let mut turfs = self.turfs.write().await;
        let before = turfs.len();
        turfs.retain(|t| t.id != id);
        Ok(turfs.len() != before)
    }

    async fn count(&self) -> CoreResult<usize> {
        Ok(self.turfs.read().await.len())
    }
}

#[derive(Default)]
struct SlotTable {
    slots: HashMap<String, Slot>,
    /// (turf, day) -> slot ids in generation order
    by_day: HashMap<(String, NaiveDate), Vec<String>>,
}

/// In-memory slot inventory. Claims and releases take the write lock for the
/// whole id set, which makes each of them a single atomic step.
#[derive(Default)]
pub struct InMemorySlotRepository {
    table: RwLock<SlotTable>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn dedup(ids: &[String]) -> Vec<&String> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn insert_many(&self, slots: Vec<Slot>) -> CoreResult<()> {
        let mut table = self.table.write().await;
        for slot in slots {
            if table.slots.contains_key(&slot.id) {
                continue;
            }
            table
                .by_day
                .entry((slot.turf_id.clone(), slot.date))
                .or_default()
                .push(slot.id.clone());
            table.slots.insert(slot.id.clone(), slot);
        }
        Ok(())
    }

    async fn list_for(&self, turf_id: &str, date: NaiveDate) -> CoreResult<Vec<Slot>> {
        let table = self.table.read().await;
        let ids = match table.by_day.get(&(turf_id.to_string(), date)) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        Ok(ids.iter().filter_map(|id| table.slots.get(id).cloned()).collect())
    }

    async fn get(&self, id: &str) -> CoreResult<Option<Slot>> {
        Ok(self.table.read().await.slots.get(id).cloned())
    }

    async fn get_many(&self, ids: &[String]) -> CoreResult<Vec<Slot>> {
        let table = self.table.read().await;
        Ok(dedup(ids)
            .into_iter()
            .filter_map(|id| table.slots.get(id).cloned())
            .collect())
    }

    async fn claim_available(&self, ids: &[String]) -> CoreResult<Vec<String>> {
        let mut table = self.table.write().await;
        let known: Vec<String> = dedup(ids)
            .into_iter()
            .filter(|id| table.slots.contains_key(*id))
            .cloned()
            .collect();

        let taken: Vec<&str> = known
            .iter()
            .filter(|id| table.slots.get(*id).map(|s| !s.available).unwrap_or(false))
            .map(String::as_str)
            .collect();
        if !taken.is_empty() {
            return Err(CoreError::Conflict(format!(
                "Slots no longer available: {}",
                taken.join(", ")
            )));
        }

        for id in &known {
            if let Some(slot) = table.slots.get_mut(id) {
                slot.available = false;
            }
        }
        Ok(known)
    }

    async fn release(&self, ids: &[String]) -> CoreResult<Vec<String>> {
        let mut table = self.table.write().await;
        let mut released = Vec::new();
        for id in dedup(ids) {
            if let Some(slot) = table.slots.get_mut(id) {
                slot.available = true;
                released.push(id.clone());
            }
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SlotGeneration;
    use crate::turf::seed_turfs;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    async fn seeded() -> InMemorySlotRepository {
        let repo = InMemorySlotRepository::new();
        let generation = SlotGeneration { horizon_days: 2, prebooked_ratio: 0.0 };
        for turf in seed_turfs() {
            repo.insert_many(generation.generate(&turf, today())).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_list_for_returns_window_order() {
        let repo = seeded().await;
        let slots = repo.list_for("turf1", today()).await.unwrap();

        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0].id, "slot_turf1_2026-10-19_0");
        assert_eq!(slots[7].id, "slot_turf1_2026-10-19_7");
        assert!(repo.list_for("turf1", today() + chrono::Days::new(5)).await.unwrap().is_empty());
        assert!(repo.list_for("nope", today()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_claim_is_all_or_nothing() {
        let repo = seeded().await;
        let a = "slot_turf1_2026-10-19_0".to_string();
        let b = "slot_turf1_2026-10-19_1".to_string();
        let c = "slot_turf1_2026-10-19_2".to_string();

        let claimed = repo.claim_available(&[a.clone(), "ghost".to_string()]).await.unwrap();
        assert_eq!(claimed, vec![a.clone()]);

        let err = repo.claim_available(&[b.clone(), a.clone(), c.clone()]).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert!(repo.get(&b).await.unwrap().unwrap().available);
        assert!(repo.get(&c).await.unwrap().unwrap().available);

        let released = repo.release(&[a.clone(), "ghost".to_string()]).await.unwrap();
        assert_eq!(released, vec![a.clone()]);
        assert!(repo.get(&a).await.unwrap().unwrap().available);
    }

    #[tokio::test]
    async fn test_concurrent_claims_on_one_slot_have_one_winner() {
        let repo = Arc::new(seeded().await);
        let id = vec!["slot_turf3_2026-10-20_4".to_string()];

        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move { repo.claim_available(&id).await.is_ok() }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
