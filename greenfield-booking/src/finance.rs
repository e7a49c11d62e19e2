use greenfield_catalog::repository::TurfRepository;
use greenfield_core::identity::require_admin;
use greenfield_core::repository::AccountRepository;
use greenfield_core::{Account, CoreResult, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::BookingPaymentStatus;
use crate::repository::BookingRepository;

/// Dashboard rollup served at `/api/admin/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: usize,
    /// Sum of `totalPrice` over bookings flagged `completed`.
    pub total_revenue: f64,
    pub total_turfs: usize,
    /// Accounts with role `user`; admins are not counted.
    pub total_users: usize,
}

/// Read-only rollups for administrators.
pub struct AdminAggregator {
    bookings: Arc<dyn BookingRepository>,
    turfs: Arc<dyn TurfRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl AdminAggregator {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        turfs: Arc<dyn TurfRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self { bookings, turfs, accounts }
    }

    /// Revenue follows the booking's own `paymentStatus` flag, not the
    /// payment records.
    pub async fn stats(&self, actor: Option<&Account>) -> CoreResult<DashboardStats> {
        require_admin(actor, "Only admins can view stats")?;

        let bookings = self.bookings.list().await?;
        let total_revenue = bookings
            .iter()
            .filter(|b| b.payment_status == BookingPaymentStatus::Completed)
            .map(|b| b.total_price)
            .sum();
        let total_users = self
            .accounts
            .list()
            .await?
            .iter()
            .filter(|a| a.role == Role::User)
            .count();

        Ok(DashboardStats {
            total_bookings: bookings.len(),
            total_revenue,
            total_turfs: self.turfs.count().await?,
            total_users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBooking, StatusUpdate};
    use crate::testing::{admin, fixture, user};
    use greenfield_core::CoreError;

    #[tokio::test]
    async fn test_stats_are_admin_only() {
        let fx = fixture().await;
        let alice = user("alice@example.com");

        for actor in [None, Some(&alice)] {
            let err = fx.aggregator.stats(actor).await.unwrap_err();
            assert!(matches!(err, CoreError::AuthorizationError(ref m) if m == "Only admins can view stats"));
        }
    }

    #[tokio::test]
    async fn test_revenue_counts_completed_bookings_only() {
        let fx = fixture().await;
        let admin = admin();
        let alice = user("alice@example.com");
        fx.accounts.insert(admin.clone()).await.unwrap();
        fx.accounts.insert(alice.clone()).await.unwrap();
        fx.accounts.insert(user("bob@example.com")).await.unwrap();

        let slots = fx.registry.list_slots("turf4", fx.today).await.unwrap();
        let mut ids = Vec::new();
        for (slot, price) in slots.iter().zip([400.0, 800.0]) {
            let booking = fx
                .ledger
                .create(
                    &alice,
                    NewBooking {
                        turf_id: Some("turf4".into()),
                        turf_name: None,
                        date: Some(fx.today),
                        slots: Some(vec![slot.id.clone()]),
                        total_price: Some(price),
                    },
                )
                .await
                .unwrap();
            ids.push(booking.id);
        }

        let stats = fx.aggregator.stats(Some(&admin)).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats { total_bookings: 2, total_revenue: 0.0, total_turfs: 5, total_users: 2 }
        );

        fx.ledger
            .update_status(
                Some(&admin),
                &ids[1],
                StatusUpdate { status: None, payment_status: Some(BookingPaymentStatus::Completed) },
            )
            .await
            .unwrap();
        let stats = fx.aggregator.stats(Some(&admin)).await.unwrap();
        assert_eq!(stats.total_revenue, 800.0);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalTurfs"], 5);
        assert!(value.get("totalRevenue").is_some());
    }
}
