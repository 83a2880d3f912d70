//! # Domain Entities
//!
//! Core entities for the asset engine: the item record, the per-item sale
//! record, the royalty configuration, and the marketplace allowlist.

use super::value_objects::{Amount, BasisPoints, ItemId, Principal, SaleStatus};
use serde::{Deserialize, Serialize};

// =============================================================================
// ITEM
// =============================================================================

/// A uniquely identified asset record.
///
/// Existence is tracked by presence in the ledger's item table; a burned id
/// stays permanently retired because the identifier counter never reuses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, assigned at mint.
    pub id: ItemId,
    /// The principal currently recorded as owning this item.
    pub holder: Principal,
}

impl Item {
    /// Create a new item record.
    #[must_use]
    pub const fn new(id: ItemId, holder: Principal) -> Self {
        Self { id, holder }
    }
}

// =============================================================================
// SALE RECORD
// =============================================================================

/// Per-item sale state.
///
/// Price and designated buyer are meaningful only when status is not
/// `NotForSale`; `reset` restores the default record exactly once per
/// completed ownership transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Current sale status.
    pub status: SaleStatus,
    /// Listed price, or the committed offer once a purchase is in progress.
    pub price: Amount,
    /// Designated buyer, set when a purchase enters `InProgress`.
    pub buyer: Option<Principal>,
}

impl SaleRecord {
    /// Restore the default `NotForSale`/0/none record.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when the record is internally consistent: a `NotForSale` record
    /// carries no price and no designated buyer.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self.status {
            SaleStatus::NotForSale => self.price == 0 && self.buyer.is_none(),
            SaleStatus::ForSale => self.price > 0,
            SaleStatus::InProgress => self.buyer.is_some(),
        }
    }
}

// =============================================================================
// ROYALTY CONFIG
// =============================================================================

/// Royalty recipient and rate applied on every enforced sale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyConfig {
    /// Principal receiving the royalty cut.
    pub recipient: Principal,
    /// Rate in basis points, 0–10_000 inclusive.
    pub rate: BasisPoints,
}

impl RoyaltyConfig {
    /// Create a royalty configuration.
    #[must_use]
    pub const fn new(recipient: Principal, rate: BasisPoints) -> Self {
        Self { recipient, rate }
    }
}

// =============================================================================
// MARKETPLACE ALLOWLIST
// =============================================================================

/// Principals whose transfers bypass royalty enforcement.
///
/// An allowlisted marketplace is trusted to have settled payment externally.
/// The list is replaced wholesale or cleared, never incrementally diffed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceAllowlist {
    members: Vec<Principal>,
}

impl MarketplaceAllowlist {
    /// Create an empty allowlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire list. Duplicates collapse; order is normalized.
    pub fn replace(&mut self, members: Vec<Principal>) {
        let mut members = members;
        members.sort_unstable();
        members.dedup();
        self.members = members;
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Membership query.
    #[must_use]
    pub fn contains(&self, principal: &Principal) -> bool {
        self.members.binary_search(principal).is_ok()
    }

    /// Current members, normalized order.
    #[must_use]
    pub fn members(&self) -> &[Principal] {
        &self.members
    }
}
