pub mod turf;
pub mod slot;
pub mod pricing;
pub mod repository;
pub mod memory;
pub mod catalog;
pub mod registry;

pub use turf::{Turf, TurfDraft};
pub use slot::{Slot, SlotGeneration};
pub use catalog::TurfCatalog;
pub use registry::SlotRegistry;
