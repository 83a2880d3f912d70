//! # Item Ledger
//!
//! Sole owner of holder and existence state. Identifiers come from a
//! monotonically increasing counter that never decreases and never reuses a
//! value; the supply cap is checked against that running counter, so burns do
//! not reopen capacity.
//!
//! The ledger also stores per-holder operator approvals, the authority model
//! the transfer path checks ("caller is holder or an approved operator").

use crate::domain::entities::Item;
use crate::domain::value_objects::{ItemId, Principal};
use crate::errors::EngineError;
use std::collections::{HashMap, HashSet};

/// Item table, identifier counter, and supply ceiling.
#[derive(Clone, Debug)]
pub struct ItemLedger {
    items: HashMap<ItemId, Item>,
    next_id: ItemId,
    supply_cap: u64,
    operators: HashMap<Principal, HashSet<Principal>>,
}

impl ItemLedger {
    /// Create an empty ledger with the given supply cap.
    #[must_use]
    pub fn new(supply_cap: u64) -> Self {
        Self {
            items: HashMap::new(),
            next_id: 0,
            supply_cap,
            operators: HashMap::new(),
        }
    }

    /// The configured supply ceiling.
    #[must_use]
    pub const fn supply_cap(&self) -> u64 {
        self.supply_cap
    }

    /// Total items ever minted (the running counter).
    #[must_use]
    pub const fn minted(&self) -> u64 {
        self.next_id
    }

    /// The identifier the next successful mint will assign.
    #[must_use]
    pub const fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// True when the running counter has reached the cap.
    #[must_use]
    pub const fn at_capacity(&self) -> bool {
        self.next_id >= self.supply_cap
    }

    /// Existence query.
    #[must_use]
    pub fn exists(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Current holder of `id`.
    pub fn holder_of(&self, id: ItemId) -> Result<Principal, EngineError> {
        self.items
            .get(&id)
            .map(|item| item.holder)
            .ok_or(EngineError::NotFound(id))
    }

    /// Assign the next identifier to a new item held by `holder`.
    ///
    /// Fails with `CapacityExceeded` once the counter reaches the cap; the
    /// counter is unchanged by a failed attempt.
    pub fn mint(&mut self, holder: Principal) -> Result<ItemId, EngineError> {
        if self.at_capacity() {
            return Err(EngineError::CapacityExceeded {
                cap: self.supply_cap,
            });
        }
        let id = self.next_id;
        self.items.insert(id, Item::new(id, holder));
        self.next_id += 1;
        Ok(id)
    }

    /// Mark `id` non-existent and clear its holder. The identifier is never
    /// reassigned.
    pub fn burn(&mut self, id: ItemId) -> Result<Item, EngineError> {
        self.items.remove(&id).ok_or(EngineError::NotFound(id))
    }

    /// Reassign the holder of an existing item.
    pub fn set_holder(&mut self, id: ItemId, to: Principal) -> Result<(), EngineError> {
        let item = self.items.get_mut(&id).ok_or(EngineError::NotFound(id))?;
        item.holder = to;
        Ok(())
    }

    /// Grant or revoke `operator`'s authority over all of `holder`'s items.
    pub fn set_operator(&mut self, holder: Principal, operator: Principal, approved: bool) {
        if approved {
            self.operators.entry(holder).or_default().insert(operator);
        } else if let Some(set) = self.operators.get_mut(&holder) {
            set.remove(&operator);
            if set.is_empty() {
                self.operators.remove(&holder);
            }
        }
    }

    /// True when `operator` may move `holder`'s items.
    #[must_use]
    pub fn is_operator(&self, holder: &Principal, operator: &Principal) -> bool {
        self.operators
            .get(holder)
            .is_some_and(|set| set.contains(operator))
    }

    /// Fail unless `caller` is `from` or an approved operator of `from`.
    pub fn require_transfer_authority(
        &self,
        caller: Principal,
        from: Principal,
        id: ItemId,
    ) -> Result<(), EngineError> {
        if caller == from || self.is_operator(&from, &caller) {
            Ok(())
        } else {
            Err(EngineError::not_owner(caller, id))
        }
    }
}
