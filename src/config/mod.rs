// src/config/mod.rs
pub mod treatment;
pub mod alternative;
pub mod parameters;
pub mod price_index;
pub mod scenario;

// Re-export commonly used types
pub use treatment::{Treatment, TreatmentLibrary, IriEffect};
pub use alternative::{Activity, Alternative};
pub use parameters::{GlobalParameters, MonteCarloSettings};
pub use price_index::{PriceIndex, PriceLevelAdjustment};
pub use scenario::Scenario;
