use chrono::NaiveDate;
use greenfield_catalog::turf::seed_turfs;
use greenfield_catalog::TurfCatalog;
use greenfield_core::credentials::CredentialStore;
use greenfield_core::CoreResult;
use tracing::info;

use crate::app_config::AuthConfig;

/// What the startup seeding step put in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    pub admin_id: String,
    pub turfs: usize,
}

/// Startup data: the bootstrap admin and the demo turfs, with slots generated
/// from `today`. Meant for empty stores; a second run is a `Conflict`.
pub async fn seed(
    credentials: &CredentialStore,
    catalog: &TurfCatalog,
    auth: &AuthConfig,
    today: NaiveDate,
) -> CoreResult<SeedSummary> {
    let admin = credentials
        .bootstrap_admin(&auth.admin_email, &auth.admin_password)
        .await?;
    let turfs = catalog.load(seed_turfs(), today).await?;

    info!("Seeded admin {} and {} turfs from {}", admin.id, turfs, today);
    Ok(SeedSummary { admin_id: admin.id, turfs })
}
