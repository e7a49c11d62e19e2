use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::turf::Turf;

/// The eight daily windows every turf offers.
pub const TIME_WINDOWS: [&str; 8] = [
    "6:00 AM - 7:00 AM",
    "7:00 AM - 8:00 AM",
    "8:00 AM - 9:00 AM",
    "5:00 PM - 6:00 PM",
    "6:00 PM - 7:00 PM",
    "7:00 PM - 8:00 PM",
    "8:00 PM - 9:00 PM",
    "9:00 PM - 10:00 PM",
];

pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// One bookable window of one turf on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: String,
    pub turf_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub available: bool,
    /// Turf price captured when the slot was generated.
    pub price: f64,
}

pub fn slot_id(turf_id: &str, date: NaiveDate, index: usize) -> String {
    format!("slot_{}_{}_{}", turf_id, date.format("%Y-%m-%d"), index)
}

/// How far ahead slots are generated and how many start out taken.
#[derive(Debug, Clone, Copy)]
pub struct SlotGeneration {
    pub horizon_days: u32,
    /// Share of generated slots marked unavailable, for demo data. 0.0 = none.
    pub prebooked_ratio: f64,
}

impl Default for SlotGeneration {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            prebooked_ratio: 0.0,
        }
    }
}

impl SlotGeneration {
    /// All slots for `turf` from `start` through `start + horizon_days - 1`.
    pub fn generate(&self, turf: &Turf, start: NaiveDate) -> Vec<Slot> {
        let mut rng = rand::thread_rng();
        let ratio = if self.prebooked_ratio.is_finite() {
            self.prebooked_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut slots = Vec::with_capacity(self.horizon_days as usize * TIME_WINDOWS.len());

        for offset in 0..self.horizon_days {
            let Some(date) = start.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            for (index, time) in TIME_WINDOWS.iter().enumerate() {
                let available = ratio == 0.0 || !rng.gen_bool(ratio);
                slots.push(Slot {
                    id: slot_id(&turf.id, date, index),
                    turf_id: turf.id.clone(),
                    date,
                    time: time.to_string(),
                    available,
                    price: turf.price,
                });
            }
        }

        slots
    }
}
