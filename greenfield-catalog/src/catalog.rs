use chrono::{NaiveDate, Utc};
use greenfield_core::identity::require_admin;
use greenfield_core::{Account, CoreError, CoreResult};
use std::sync::Arc;
use tracing::info;

use crate::registry::SlotRegistry;
use crate::repository::TurfRepository;
use crate::slot::SlotGeneration;
use crate::turf::{Turf, TurfDraft};

/// Single entry point for turf reads and admin-only turf mutations. Both the
/// public `/api/turfs` routes and the `/api/admin/turfs` routes land here.
pub struct TurfCatalog {
    turfs: Arc<dyn TurfRepository>,
    registry: Arc<SlotRegistry>,
    generation: SlotGeneration,
}

impl TurfCatalog {
    pub fn new(
        turfs: Arc<dyn TurfRepository>,
        registry: Arc<SlotRegistry>,
        generation: SlotGeneration,
    ) -> Self {
        Self { turfs, registry, generation }
    }

    pub async fn list(&self) -> CoreResult<Vec<Turf>> {
        self.turfs.list().await
    }

    /// Admin dashboard listing; same data as [`list`](Self::list).
    pub async fn list_for_admin(&self, actor: Option<&Account>) -> CoreResult<Vec<Turf>> {
        require_admin(actor, "Only admins can view turfs")?;
        self.turfs.list().await
    }

    pub async fn get(&self, turf_id: &str) -> CoreResult<Turf> {
        self.turfs
            .get(turf_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Turf not found".to_string()))
    }

    pub async fn count(&self) -> CoreResult<usize> {
        self.turfs.count().await
    }

    /// Creates a turf and generates its slots from today over the horizon.
    pub async fn create(&self, actor: Option<&Account>, draft: TurfDraft) -> CoreResult<Turf> {
        let admin = require_admin(actor, "Only admins can create turfs")?;
        let turf = draft.into_turf(format!("turf_{}", uuid::Uuid::new_v4().simple()))?;

        self.turfs.insert(turf.clone()).await?;
        self.registry
            .register(self.generation.generate(&turf, Utc::now().date_naive()))
            .await?;

        info!("Turf {} created by {}", turf.id, admin.id);
        Ok(turf)
    }

    pub async fn update(
        &self,
        actor: Option<&Account>,
        turf_id: &str,
        draft: TurfDraft,
    ) -> CoreResult<Turf> {
        let admin = require_admin(actor, "Only admins can update turfs")?;
        let mut turf = self.get(turf_id).await?;
        turf.apply(draft);

        if !self.turfs.update(turf.clone()).await? {
            return Err(CoreError::NotFound("Turf not found".to_string()));
        }
        info!("Turf {} updated by {}", turf.id, admin.id);
        Ok(turf)
    }

    /// Removes the listing. Slots and bookings referencing the turf are kept.
    pub async fn delete(&self, actor: Option<&Account>, turf_id: &str) -> CoreResult<()> {
        let admin = require_admin(actor, "Only admins can delete turfs")?;
        if !self.turfs.delete(turf_id).await? {
            return Err(CoreError::NotFound("Turf not found".to_string()));
        }
        info!("Turf {} deleted by {}", turf_id, admin.id);
        Ok(())
    }

    /// Startup seeding: stores the turfs and generates their slots from `start`.
    pub async fn load(&self, turfs: Vec<Turf>, start: NaiveDate) -> CoreResult<usize> {
        let mut loaded = 0;
        for turf in turfs {
            self.turfs.insert(turf.clone()).await?;
            self.registry.register(self.generation.generate(&turf, start)).await?;
            loaded += 1;
        }
        Ok(loaded)
    }
}
