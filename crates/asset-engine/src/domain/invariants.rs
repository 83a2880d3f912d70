//! # Domain Invariants
//!
//! Invariants that must hold across every engine operation, expressed as
//! runtime-checkable predicates. The service exposes an aggregate check used
//! by the test suite after every scenario.

use crate::domain::entities::{RoyaltyConfig, SaleRecord};
use crate::domain::ledger::ItemLedger;
use crate::domain::sale_book::SaleBook;
use crate::domain::value_objects::{Amount, BasisPoints, ItemId};

/// Royalty rate never exceeds 10_000 basis points.
#[must_use]
pub fn check_royalty_rate(config: &RoyaltyConfig) -> bool {
    config.rate.as_u16() <= BasisPoints::MAX
}

/// Royalty and seller amounts always sum exactly to the settlement total.
#[must_use]
pub fn check_settlement_conservation(total: Amount, royalty: Amount, seller: Amount) -> bool {
    royalty.checked_add(seller) == Some(total)
}

/// The identifier counter never decreases.
#[must_use]
pub fn check_counter_monotonic(before: ItemId, after: ItemId) -> bool {
    after >= before
}

/// The running counter never passes the supply cap.
#[must_use]
pub fn check_supply_cap(ledger: &ItemLedger) -> bool {
    ledger.minted() <= ledger.supply_cap()
}

/// Every live item's identifier was assigned by the counter.
#[must_use]
pub fn check_ids_assigned_by_counter(ledger: &ItemLedger, ids: &[ItemId]) -> bool {
    ids.iter().all(|id| *id < ledger.next_id())
}

/// A sale record is internally consistent (price/buyer meaningful only when
/// the status says so).
#[must_use]
pub fn check_sale_record(record: &SaleRecord) -> bool {
    record.is_consistent()
}

/// Aggregate result of checking all engine invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// True when no violation was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Royalty rate above 10_000 bps.
    RoyaltyRateOutOfRange {
        /// The offending rate.
        rate: u16,
    },
    /// Running counter above the supply cap.
    SupplyCapExceeded {
        /// Items ever minted.
        minted: u64,
        /// The configured cap.
        cap: u64,
    },
    /// A sale record carries price or buyer inconsistent with its status.
    InconsistentSaleRecord {
        /// The item whose record is inconsistent.
        id: ItemId,
    },
    /// A sale record points at an item the ledger does not know.
    DanglingSaleRecord {
        /// The orphaned identifier.
        id: ItemId,
    },
}

/// Check all engine-wide invariants at once.
#[must_use]
pub fn check_all_invariants(
    ledger: &ItemLedger,
    sales: &SaleBook,
    royalty: &RoyaltyConfig,
    listed_ids: &[ItemId],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_royalty_rate(royalty) {
        violations.push(InvariantViolation::RoyaltyRateOutOfRange {
            rate: royalty.rate.as_u16(),
        });
    }

    if !check_supply_cap(ledger) {
        violations.push(InvariantViolation::SupplyCapExceeded {
            minted: ledger.minted(),
            cap: ledger.supply_cap(),
        });
    }

    for &id in listed_ids {
        let record = sales.record(id);
        if !check_sale_record(&record) {
            violations.push(InvariantViolation::InconsistentSaleRecord { id });
        }
        if record.status.is_active() && !ledger.exists(id) {
            violations.push(InvariantViolation::DanglingSaleRecord { id });
        }
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}
