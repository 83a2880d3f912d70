//! # Sale Book
//!
//! Sale records keyed by item identifier. The book owns listing and purchase
//! state but never mutates holder state directly; it authorizes or vetoes a
//! transfer and is reset by the settlement path exactly once per completed
//! ownership change.

use crate::domain::entities::SaleRecord;
use crate::domain::value_objects::{Amount, ItemId, Principal, SaleStatus};
use crate::errors::EngineError;
use std::collections::HashMap;

/// Per-item sale records. Items without an entry carry the default
/// `NotForSale`/0/none record.
#[derive(Clone, Debug, Default)]
pub struct SaleBook {
    records: HashMap<ItemId, SaleRecord>,
}

impl SaleBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current record for `id` (default when never listed).
    #[must_use]
    pub fn record(&self, id: ItemId) -> SaleRecord {
        self.records.get(&id).copied().unwrap_or_default()
    }

    /// List, reprice, or delist an item.
    ///
    /// Price 0 forces `NotForSale` and clears the designated buyer; a
    /// positive price lists at that amount. Rejected with `InvalidState`
    /// while a purchase is in progress.
    pub fn set_price(&mut self, id: ItemId, price: Amount) -> Result<SaleRecord, EngineError> {
        let mut record = self.record(id);
        let target = if price == 0 {
            SaleStatus::NotForSale
        } else {
            SaleStatus::ForSale
        };

        if !record.status.can_transition_to(target) {
            return Err(EngineError::InvalidState {
                id,
                status: record.status,
            });
        }

        record.status = target;
        record.price = price;
        if price == 0 {
            record.buyer = None;
        }

        self.store(id, record);
        Ok(record)
    }

    /// Commit a buyer to an in-progress purchase.
    ///
    /// Requires `ForSale` status and an offer covering the asking price. The
    /// offered amount becomes the settlement base (paying above ask is
    /// allowed and recorded), and the caller becomes the designated buyer.
    pub fn begin_purchase(
        &mut self,
        id: ItemId,
        buyer: Principal,
        offered: Amount,
    ) -> Result<SaleRecord, EngineError> {
        let mut record = self.record(id);

        if !record.status.can_transition_to(SaleStatus::InProgress) {
            return Err(EngineError::InvalidState {
                id,
                status: record.status,
            });
        }
        if offered < record.price {
            return Err(EngineError::InsufficientOffer {
                offered,
                asking: record.price,
            });
        }

        record.status = SaleStatus::InProgress;
        record.price = offered;
        record.buyer = Some(buyer);

        self.store(id, record);
        Ok(record)
    }

    /// Authorize a sale-enforced transfer of `id` to `to`.
    ///
    /// Requires an in-progress purchase whose designated buyer is exactly
    /// `to`; returns the recorded settlement base. Does not mutate: the
    /// settlement path calls `complete` only after funds have moved.
    pub fn clearance(&self, id: ItemId, to: Principal) -> Result<Amount, EngineError> {
        let record = self.record(id);
        if record.status == SaleStatus::InProgress && record.buyer == Some(to) {
            Ok(record.price)
        } else {
            Err(EngineError::TransferNotAuthorizedBySale { id })
        }
    }

    /// Reset the record after a completed settlement.
    pub fn complete(&mut self, id: ItemId) {
        self.records.remove(&id);
    }

    /// Drop the record of a burned item.
    pub fn remove(&mut self, id: ItemId) {
        self.records.remove(&id);
    }

    /// Identifiers with a non-default record, in ascending order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn store(&mut self, id: ItemId, record: SaleRecord) {
        // Default records are represented by absence.
        if record == SaleRecord::default() {
            self.records.remove(&id);
        } else {
            self.records.insert(id, record);
        }
    }
}
