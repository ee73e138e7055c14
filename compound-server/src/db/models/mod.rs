//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod account;

// Catalog
pub mod substance;

// Orders
pub mod composition;
pub mod medicine;

// Re-exports
pub use account::Account;
pub use composition::{CompositionEntry, CompositionLine, WeightUpdate};
pub use medicine::{Medicine, MedicineStatus, MedicineSummary};
pub use substance::{Substance, SubstanceCreate, SubstanceStatus, SubstanceUpdate};
