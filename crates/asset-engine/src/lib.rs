//! # Asset Engine - Lifecycle & Sale-Settlement Subsystem
//!
//! Issues, tracks, and settles ownership of uniquely identified digital
//! assets on behalf of independent deployments, each with its own
//! administrators, minters, supply limit, and royalty policy.
//!
//! ## Purpose
//!
//! The engine couples four things that must stay consistent under external
//! callbacks:
//!
//! - a strict per-item sale state machine (`NotForSale` → `ForSale` →
//!   `InProgress` → `NotForSale`) with externally-triggered transitions,
//! - authorization checks evaluated at the top of every mutation,
//! - a reentrancy-sensitive fund-movement path splitting royalties from
//!   seller proceeds,
//! - partial-batch semantics under a bounded execution budget.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Identifiers never reused, counter never decreases | `domain/ledger.rs` - counter-only allocation |
//! | Supply cap counts items ever minted, not live items | `domain/ledger.rs::ItemLedger::mint` |
//! | Price/buyer meaningful only outside `NotForSale` | `domain/sale_book.rs` + `SaleRecord::is_consistent` |
//! | Royalty rate ≤ 10_000 bps | `BasisPoints` construction |
//! | Royalty + seller amounts sum exactly to the price | `domain/services.rs::split_settlement` |
//! | No state change on a failed operation | `service.rs` - commit-after-validate ordering |
//! | `InProgress` committed before funds move; reset after | `service.rs::purchase` / `finalize_sale` |
//!
//! ## Module Structure
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Role registry | `domain/roles.rs` | ADMIN/MINTER membership, admin-gated mutation |
//! | Item ledger | `domain/ledger.rs` | Holder/existence tables, id counter, cap, operators |
//! | Sale book | `domain/sale_book.rs` | Listing, purchase commitment, transfer clearance |
//! | Settlement math | `domain/services.rs` | Basis-point split, batch capacity |
//! | Invariant checks | `domain/invariants.rs` | Runtime aggregate checker |
//! | Ports | `ports/` | Driving API; disburser/eligibility/meter boundaries |
//! | Adapters | `adapters/` | In-memory treasury, eligibility set, budget meters |
//! | Service | `service.rs` | Orchestration, reentrancy guard, batch executor |
//! | Notifications | `events.rs` | Broadcast bus, enveloped payloads |
//!
//! ## Usage Example
//!
//! ```ignore
//! use asset_engine::prelude::*;
//!
//! let engine = create_test_service(ServiceConfig::new(admin));
//! let id = engine.mint(minter, holder).await?;
//! engine.set_price(holder, id, 1000).await?;
//! engine.purchase(buyer, id, 1000).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{Item, MarketplaceAllowlist, RoyaltyConfig, SaleRecord};

    // Value objects
    pub use crate::domain::value_objects::{
        Amount, BasisPoints, Hash, ItemId, Principal, Role, SaleStatus,
    };

    // Domain services
    pub use crate::domain::services::{admissible_mint_count, split_settlement};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{AssetEngineApi, BatchMintOutcome, TransferRequest};
    pub use crate::ports::outbound::{
        ExecutionMeter, FundDisburser, MintEligibility, MockDisburser,
    };

    // Events
    pub use crate::events::{EngineEvent, EventBus, EventEnvelope};

    // Errors
    pub use crate::errors::{DisburseError, EngineError};

    // Adapters
    pub use crate::adapters::{
        FixedBudgetMeter, InMemoryTreasury, StaticEligibility, UnmeteredExecution,
    };

    // Service
    pub use crate::service::{
        create_test_service, AssetEngineService, ServiceConfig, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
