//! # Driving Ports (API - Inbound)
//!
//! The interface the engine exposes to operators and collaborating systems.
//! Every mutating operation takes the initiating caller explicitly; identity
//! is never ambient.

use crate::domain::value_objects::{Amount, BasisPoints, Hash, ItemId, Principal, Role, SaleStatus};
use crate::errors::EngineError;
use crate::events::EventEnvelope;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// =============================================================================
// REQUEST / OUTCOME TYPES
// =============================================================================

/// One entry of a batch transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Current holder.
    pub from: Principal,
    /// Destination principal.
    pub to: Principal,
    /// The item to move.
    pub id: ItemId,
}

/// Result of a batch mint.
///
/// Batch minting may complete fewer items than requested without failing;
/// callers must inspect the returned range rather than assume the requested
/// count was honored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMintOutcome {
    /// First identifier minted, None when nothing was minted.
    pub first: Option<ItemId>,
    /// Last identifier minted, None when nothing was minted.
    pub last: Option<ItemId>,
    /// How many items were actually created.
    pub minted: u64,
}

impl BatchMintOutcome {
    /// The minted identifier range, when anything was minted.
    #[must_use]
    pub fn range(&self) -> Option<(ItemId, ItemId)> {
        self.first.zip(self.last)
    }

    /// True when the full requested count was honored.
    #[must_use]
    pub fn fulfilled(&self, requested: u64) -> bool {
        self.minted == requested
    }
}

// =============================================================================
// ENGINE API (Primary Driving Port)
// =============================================================================

/// Primary API of the asset engine.
///
/// All errors are atomic: a failing call leaves every table untouched, with
/// the single declared exception of batch mint's partial-completion success
/// path.
#[async_trait]
pub trait AssetEngineApi: Send + Sync {
    // --- Role management ---

    /// Grant `role` to `principal`. Caller must hold `Admin`.
    async fn grant_role(
        &self,
        caller: Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), EngineError>;

    /// Revoke `role` from `principal`. Caller must hold `Admin`.
    async fn revoke_role(
        &self,
        caller: Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), EngineError>;

    /// Side-effect-free membership query.
    async fn has_role(&self, role: Role, principal: Principal) -> bool;

    // --- Item lifecycle ---

    /// Mint one item to `holder`. Caller must hold `Minter`.
    async fn mint(&self, caller: Principal, holder: Principal) -> Result<ItemId, EngineError>;

    /// Mint one item to `holder` on the strength of an eligibility proof
    /// instead of the `Minter` role.
    async fn mint_eligible(
        &self,
        caller: Principal,
        holder: Principal,
        proof: &[Hash],
    ) -> Result<ItemId, EngineError>;

    /// Mint up to `count` items to `holder` under the execution budget.
    /// Completing fewer than requested is a success; see `BatchMintOutcome`.
    async fn mint_batch(
        &self,
        caller: Principal,
        holder: Principal,
        count: u64,
    ) -> Result<BatchMintOutcome, EngineError>;

    /// Delete one item. Caller must be the holder or hold `Admin`.
    async fn burn(&self, caller: Principal, id: ItemId) -> Result<(), EngineError>;

    /// Delete a batch, all-or-nothing. Caller must hold `Admin`.
    async fn burn_batch(&self, caller: Principal, ids: &[ItemId]) -> Result<(), EngineError>;

    /// Transfer one item. Caller must be `from` or an approved operator;
    /// the sale hook authorizes or vetoes the move before holder state
    /// changes.
    async fn transfer(
        &self,
        caller: Principal,
        from: Principal,
        to: Principal,
        id: ItemId,
    ) -> Result<(), EngineError>;

    /// Transfer a batch, all-or-nothing.
    async fn transfer_batch(
        &self,
        caller: Principal,
        entries: &[TransferRequest],
    ) -> Result<(), EngineError>;

    /// Grant or revoke `operator`'s authority over the caller's items.
    async fn set_operator(
        &self,
        caller: Principal,
        operator: Principal,
        approved: bool,
    ) -> Result<(), EngineError>;

    // --- Item queries ---

    /// Existence query.
    async fn item_exists(&self, id: ItemId) -> bool;

    /// Current holder of `id`.
    async fn holder_of(&self, id: ItemId) -> Result<Principal, EngineError>;

    /// Total items ever minted (the running identifier counter).
    async fn minted(&self) -> u64;

    /// The configured supply ceiling.
    async fn supply_cap(&self) -> u64;

    // --- Sales ---

    /// List, reprice (price > 0), or delist (price 0) an item. Caller must
    /// be the current holder.
    async fn set_price(
        &self,
        caller: Principal,
        id: ItemId,
        price: Amount,
    ) -> Result<(), EngineError>;

    /// Buy a listed item, offering `offered` (>= asking price). Settles the
    /// royalty split and transfers ownership to the caller.
    async fn purchase(
        &self,
        caller: Principal,
        id: ItemId,
        offered: Amount,
    ) -> Result<(), EngineError>;

    /// Recorded price of `id`.
    async fn get_price(&self, id: ItemId) -> Result<Amount, EngineError>;

    /// Sale status of `id`.
    async fn get_status(&self, id: ItemId) -> Result<SaleStatus, EngineError>;

    // --- Royalty ---

    /// Configure royalty recipient and rate. Caller must hold `Admin`;
    /// recipient must be non-zero, rate at most 10_000 bps.
    async fn set_royalty(
        &self,
        caller: Principal,
        recipient: Principal,
        rate_bps: u16,
    ) -> Result<(), EngineError>;

    /// Current royalty recipient.
    async fn royalty_owner(&self) -> Principal;

    /// Current royalty rate.
    async fn royalty_rate(&self) -> BasisPoints;

    // --- Marketplace allowlist ---

    /// Replace the marketplace allowlist wholesale. Caller must hold `Admin`.
    async fn set_marketplace(
        &self,
        caller: Principal,
        members: Vec<Principal>,
    ) -> Result<(), EngineError>;

    /// Current allowlist members.
    async fn get_marketplace(&self) -> Vec<Principal>;

    /// Remove every allowlist member. Caller must hold `Admin`.
    async fn clear_marketplace(&self, caller: Principal) -> Result<(), EngineError>;

    // --- Notifications ---

    /// Subscribe to all future notifications.
    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope>;
}
