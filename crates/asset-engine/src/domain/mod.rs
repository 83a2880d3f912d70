//! # Domain Layer
//!
//! Pure domain logic: entities, value objects, the item ledger, the sale
//! book, the role registry, settlement arithmetic, and invariant checks.
//! Nothing in this layer performs I/O or touches the outbound ports.

pub mod entities;
pub mod invariants;
pub mod ledger;
pub mod roles;
pub mod sale_book;
pub mod services;
pub mod value_objects;

pub use entities::{Item, MarketplaceAllowlist, RoyaltyConfig, SaleRecord};
pub use invariants::{check_all_invariants, InvariantCheckResult, InvariantViolation};
pub use ledger::ItemLedger;
pub use roles::RoleRegistry;
pub use sale_book::SaleBook;
pub use services::{admissible_mint_count, split_settlement};
pub use value_objects::{Amount, BasisPoints, Hash, ItemId, Principal, Role, SaleStatus};
