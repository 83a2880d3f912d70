//! # Asset Engine Service
//!
//! The orchestrating service behind the `AssetEngineApi` port. Every mutating
//! request passes authorization (role registry or ownership), then ledger
//! existence checks, and transfers additionally pass the sale hook and
//! royalty settlement.
//!
//! ## Settlement ordering
//!
//! A disbursement hands control to arbitrary external logic that may call
//! back into the engine before returning. Two defenses apply:
//!
//! 1. An atomic entry flag wraps every entry point that can reach the
//!    settlement path (`purchase`, `transfer`, `transfer_batch`); a nested
//!    call fails fast with `ReentrancyRejected`.
//! 2. Internal state commits strictly outside the disbursement window: the
//!    `InProgress` commitment lands before any funds move, and the sale-record
//!    reset plus holder reassignment land only after every leg succeeded. A
//!    reentrant read therefore always sees a consistent, already-advanced
//!    state, and no lock is held across an `await` into the disburser.

use crate::adapters::{InMemoryTreasury, StaticEligibility, UnmeteredExecution};
use crate::domain::entities::{MarketplaceAllowlist, RoyaltyConfig};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::ledger::ItemLedger;
use crate::domain::roles::RoleRegistry;
use crate::domain::sale_book::SaleBook;
use crate::domain::services::{admissible_mint_count, split_settlement};
use crate::domain::value_objects::{
    Amount, BasisPoints, Hash, ItemId, Principal, Role, SaleStatus,
};
use crate::errors::EngineError;
use crate::events::{
    EngineEvent, EventBus, EventEnvelope, ItemBurnedPayload, ItemMintedPayload,
    ItemPurchasedPayload, ItemTransferredPayload, ItemsBurnedBatchPayload,
    ItemsMintedBatchPayload, ItemsTransferredBatchPayload, MarketplaceListChangedPayload,
    PriceSetPayload, RoyaltyConfigChangedPayload,
};
use crate::ports::inbound::{AssetEngineApi, BatchMintOutcome, TransferRequest};
use crate::ports::outbound::{ExecutionMeter, FundDisburser, MintEligibility};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Work units charged against the execution budget per minted item.
pub const DEFAULT_MINT_COST_UNITS: u64 = 25;

/// Budget floor below which batch minting stops early.
pub const DEFAULT_MINT_BUDGET_MARGIN: u64 = 50;

/// Per-instance engine configuration.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Principal seeded with the administrative role.
    pub admin: Principal,
    /// Upper bound on total items ever minted.
    pub supply_cap: u64,
    /// Initial royalty configuration.
    pub royalty: RoyaltyConfig,
    /// Principals seeded with the minter role.
    pub minters: Vec<Principal>,
    /// Work units charged per minted item in a batch.
    pub mint_cost_units: u64,
    /// Safety margin: batch minting stops once the meter drops to this.
    pub mint_budget_margin: u64,
}

impl ServiceConfig {
    /// Configuration with the given admin and no other policy: unlimited
    /// supply, no royalty, no minters.
    #[must_use]
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            supply_cap: u64::MAX,
            royalty: RoyaltyConfig::default(),
            minters: Vec::new(),
            mint_cost_units: DEFAULT_MINT_COST_UNITS,
            mint_budget_margin: DEFAULT_MINT_BUDGET_MARGIN,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(Principal::ZERO)
    }
}

/// Statistics for the engine service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Items created (single, batch, and eligibility mints).
    pub items_minted: u64,
    /// Items deleted.
    pub items_burned: u64,
    /// Completed ownership changes (including purchases).
    pub transfers_completed: u64,
    /// Transfers that bypassed settlement via the marketplace allowlist.
    pub exempt_transfers: u64,
    /// Purchases settled to completion.
    pub purchases_completed: u64,
    /// Total royalty amount disbursed.
    pub royalties_disbursed: Amount,
    /// Settlements aborted by a failed disbursement.
    pub settlement_failures: u64,
    /// Nested calls rejected by the reentrancy guard.
    pub reentrancy_rejections: u64,
}

// =============================================================================
// REENTRANCY GUARD
// =============================================================================

/// RAII guard over the non-reentrant entry flag. Released on every exit
/// path, including failure.
struct EntryGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> EntryGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, EngineError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(EngineError::ReentrancyRejected);
        }
        Ok(Self { flag })
    }
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// ENGINE STATE
// =============================================================================

/// All mutable instance state, behind one lock. Mutated only by the single
/// in-flight call; the lock exists for interior mutability, not for
/// parallelism.
#[derive(Debug)]
struct EngineState {
    roles: RoleRegistry,
    ledger: ItemLedger,
    sales: SaleBook,
    royalty: RoyaltyConfig,
    marketplace: MarketplaceAllowlist,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The asset engine.
pub struct AssetEngineService<T, E, M>
where
    T: FundDisburser,
    E: MintEligibility,
    M: ExecutionMeter,
{
    config: ServiceConfig,
    state: RwLock<EngineState>,
    treasury: Arc<T>,
    eligibility: Arc<E>,
    meter: Arc<M>,
    entry_flag: AtomicBool,
    stats: RwLock<ServiceStats>,
    events: EventBus,
}

impl<T, E, M> AssetEngineService<T, E, M>
where
    T: FundDisburser,
    E: MintEligibility,
    M: ExecutionMeter,
{
    /// Create an engine instance wired to the given outbound services.
    #[must_use]
    pub fn new(
        treasury: Arc<T>,
        eligibility: Arc<E>,
        meter: Arc<M>,
        config: ServiceConfig,
    ) -> Self {
        let mut roles = RoleRegistry::new(config.admin);
        for minter in &config.minters {
            roles.seed(Role::Minter, *minter);
        }

        let state = EngineState {
            roles,
            ledger: ItemLedger::new(config.supply_cap),
            sales: SaleBook::new(),
            royalty: config.royalty,
            marketplace: MarketplaceAllowlist::new(),
        };

        Self {
            config,
            state: RwLock::new(state),
            treasury,
            eligibility,
            meter,
            entry_flag: AtomicBool::new(false),
            stats: RwLock::new(ServiceStats::default()),
            events: EventBus::new(),
        }
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Run every engine-wide invariant check against live state.
    pub async fn verify_invariants(&self) -> InvariantCheckResult {
        let state = self.state.read().await;
        let listed = state.sales.active_ids();
        check_all_invariants(&state.ledger, &state.sales, &state.royalty, &listed)
    }

    // -------------------------------------------------------------------------
    // Internal: guard, settlement, sale finalization
    // -------------------------------------------------------------------------

    /// Acquire the non-reentrant entry flag or reject the nested call.
    async fn enter(&self) -> Result<EntryGuard<'_>, EngineError> {
        match EntryGuard::acquire(&self.entry_flag) {
            Ok(guard) => Ok(guard),
            Err(err) => {
                self.stats.write().await.reentrancy_rejections += 1;
                warn!("nested call into the settlement path rejected");
                Err(err)
            }
        }
    }

    /// Disburse the legs of one settlement. On a failed leg, every completed
    /// leg is reclaimed so funds match the pre-attempt state.
    async fn settle(&self, seller: Principal, price: Amount) -> Result<Amount, EngineError> {
        let royalty = self.state.read().await.royalty;
        let (royalty_paid, legs) = settlement_legs(&royalty, seller, price);

        let mut completed: Vec<(Principal, Amount)> = Vec::with_capacity(legs.len());
        for (recipient, amount) in legs {
            if let Err(err) = self.treasury.disburse(recipient, amount).await {
                self.unwind(&completed).await;
                self.stats.write().await.settlement_failures += 1;
                return Err(err.into());
            }
            completed.push((recipient, amount));
        }
        Ok(royalty_paid)
    }

    /// Reclaim completed legs of an aborted settlement, most recent first.
    async fn unwind(&self, completed: &[(Principal, Amount)]) {
        for &(recipient, amount) in completed.iter().rev() {
            if let Err(err) = self.treasury.reclaim(recipient, amount).await {
                error!(recipient = %recipient, amount, error = %err,
                    "failed to unwind settlement leg");
            }
        }
    }

    /// The sale-enforced path: authorize against the sale record, settle,
    /// then commit the record reset and holder reassignment.
    ///
    /// The reset happens only after settlement succeeds, so an aborted
    /// settlement leaves the record unmutated.
    async fn finalize_sale(
        &self,
        id: ItemId,
        seller: Principal,
        buyer: Principal,
    ) -> Result<(Amount, Amount), EngineError> {
        let price = self.state.read().await.sales.clearance(id, buyer)?;

        let royalty_paid = self.settle(seller, price).await?;

        {
            let mut state = self.state.write().await;
            state.sales.complete(id);
            state.ledger.set_holder(id, buyer)?;
        }
        Ok((price, royalty_paid))
    }
}

/// Compute the non-zero legs of a settlement. An unset royalty recipient
/// behaves as a zero rate.
fn settlement_legs(
    royalty: &RoyaltyConfig,
    seller: Principal,
    price: Amount,
) -> (Amount, Vec<(Principal, Amount)>) {
    let rate = if royalty.recipient.is_zero() {
        BasisPoints::default()
    } else {
        royalty.rate
    };
    let (royalty_amount, seller_amount) = split_settlement(price, rate);

    let mut legs = Vec::with_capacity(2);
    if royalty_amount > 0 {
        legs.push((royalty.recipient, royalty_amount));
    }
    if seller_amount > 0 {
        legs.push((seller, seller_amount));
    }
    (royalty_amount, legs)
}

// =============================================================================
// API IMPLEMENTATION
// =============================================================================

#[async_trait]
impl<T, E, M> AssetEngineApi for AssetEngineService<T, E, M>
where
    T: FundDisburser,
    E: MintEligibility,
    M: ExecutionMeter,
{
    // --- Role management ---

    async fn grant_role(
        &self,
        caller: Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), EngineError> {
        self.state.write().await.roles.grant(caller, role, principal)?;
        info!(role = %role, principal = %principal, "role granted");
        Ok(())
    }

    async fn revoke_role(
        &self,
        caller: Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), EngineError> {
        self.state.write().await.roles.revoke(caller, role, principal)?;
        info!(role = %role, principal = %principal, "role revoked");
        Ok(())
    }

    async fn has_role(&self, role: Role, principal: Principal) -> bool {
        self.state.read().await.roles.has_role(role, &principal)
    }

    // --- Item lifecycle ---

    #[instrument(skip(self), fields(caller = %caller, holder = %holder))]
    async fn mint(&self, caller: Principal, holder: Principal) -> Result<ItemId, EngineError> {
        let id = {
            let mut state = self.state.write().await;
            state.roles.require(caller, Role::Minter)?;
            state.ledger.mint(holder)?
        };
        self.stats.write().await.items_minted += 1;
        self.events
            .publish(EngineEvent::ItemMinted(ItemMintedPayload { id, holder }));
        info!(id, "item minted");
        Ok(id)
    }

    #[instrument(skip(self, proof), fields(caller = %caller, holder = %holder))]
    async fn mint_eligible(
        &self,
        caller: Principal,
        holder: Principal,
        proof: &[Hash],
    ) -> Result<ItemId, EngineError> {
        if !self.eligibility.is_eligible(caller, proof) {
            return Err(EngineError::Unauthorized {
                principal: caller,
                required: "eligibility proof".to_string(),
            });
        }
        let id = self.state.write().await.ledger.mint(holder)?;
        self.stats.write().await.items_minted += 1;
        self.events
            .publish(EngineEvent::ItemMinted(ItemMintedPayload { id, holder }));
        info!(id, "item minted via eligibility proof");
        Ok(id)
    }

    #[instrument(skip(self), fields(caller = %caller, holder = %holder))]
    async fn mint_batch(
        &self,
        caller: Principal,
        holder: Principal,
        count: u64,
    ) -> Result<BatchMintOutcome, EngineError> {
        let outcome = {
            let mut state = self.state.write().await;
            state.roles.require(caller, Role::Minter)?;

            let admissible =
                admissible_mint_count(count, state.ledger.next_id(), state.ledger.supply_cap());
            let mut outcome = BatchMintOutcome::default();

            // Partial completion is a success path: stop at the cap or once
            // the budget drops to the safety margin, and report the range.
            while outcome.minted < admissible {
                if self.meter.remaining() <= self.config.mint_budget_margin {
                    debug!(minted = outcome.minted, "batch mint stopped at budget margin");
                    break;
                }
                let id = state.ledger.mint(holder)?;
                self.meter.charge(self.config.mint_cost_units);
                outcome.first.get_or_insert(id);
                outcome.last = Some(id);
                outcome.minted += 1;
            }
            outcome
        };

        self.stats.write().await.items_minted += outcome.minted;
        if let Some((first, last)) = outcome.range() {
            self.events
                .publish(EngineEvent::ItemsMintedBatch(ItemsMintedBatchPayload {
                    first,
                    last,
                    holder,
                    requested: count,
                }));
        }
        info!(minted = outcome.minted, requested = count, "batch mint completed");
        Ok(outcome)
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn burn(&self, caller: Principal, id: ItemId) -> Result<(), EngineError> {
        let holder = {
            let mut state = self.state.write().await;
            let holder = state.ledger.holder_of(id)?;
            if caller != holder && !state.roles.has_role(Role::Admin, &caller) {
                return Err(EngineError::not_owner(caller, id));
            }
            state.ledger.burn(id)?;
            state.sales.remove(id);
            holder
        };
        self.stats.write().await.items_burned += 1;
        self.events
            .publish(EngineEvent::ItemBurned(ItemBurnedPayload { id, holder }));
        info!(id, "item burned");
        Ok(())
    }

    #[instrument(skip(self, ids), fields(caller = %caller, count = ids.len()))]
    async fn burn_batch(&self, caller: Principal, ids: &[ItemId]) -> Result<(), EngineError> {
        {
            let mut state = self.state.write().await;
            state.roles.require(caller, Role::Admin)?;

            // All-or-nothing: validate every entry before touching anything.
            let mut seen = HashSet::new();
            for &id in ids {
                if !state.ledger.exists(id) || !seen.insert(id) {
                    return Err(EngineError::NotFound(id));
                }
            }
            for &id in ids {
                state.ledger.burn(id)?;
                state.sales.remove(id);
            }
        }
        self.stats.write().await.items_burned += ids.len() as u64;
        if !ids.is_empty() {
            self.events
                .publish(EngineEvent::ItemsBurnedBatch(ItemsBurnedBatchPayload {
                    ids: ids.to_vec(),
                }));
        }
        info!(count = ids.len(), "batch burn completed");
        Ok(())
    }

    #[instrument(skip(self), fields(caller = %caller, from = %from, to = %to))]
    async fn transfer(
        &self,
        caller: Principal,
        from: Principal,
        to: Principal,
        id: ItemId,
    ) -> Result<(), EngineError> {
        let _guard = self.enter().await?;

        let exempt = {
            let state = self.state.read().await;
            let holder = state.ledger.holder_of(id)?;
            if holder != from {
                return Err(EngineError::not_owner(from, id));
            }
            state.ledger.require_transfer_authority(caller, from, id)?;
            state.marketplace.contains(&caller)
        };

        if exempt {
            // Allowlisted marketplaces settled payment externally; sale and
            // royalty state stay untouched.
            self.state.write().await.ledger.set_holder(id, to)?;
            let mut stats = self.stats.write().await;
            stats.transfers_completed += 1;
            stats.exempt_transfers += 1;
            drop(stats);
            debug!(id, "exempt transfer completed");
        } else {
            let (_, royalty_paid) = self.finalize_sale(id, from, to).await?;
            let mut stats = self.stats.write().await;
            stats.transfers_completed += 1;
            stats.royalties_disbursed += royalty_paid;
            drop(stats);
            debug!(id, royalty_paid, "sale-enforced transfer completed");
        }

        self.events
            .publish(EngineEvent::ItemTransferred(ItemTransferredPayload {
                id,
                from,
                to,
                exempt,
            }));
        Ok(())
    }

    #[instrument(skip(self, entries), fields(caller = %caller, count = entries.len()))]
    async fn transfer_batch(
        &self,
        caller: Principal,
        entries: &[TransferRequest],
    ) -> Result<(), EngineError> {
        let _guard = self.enter().await?;

        // Phase 1: validate every entry against a simulated view, so later
        // entries see the holder changes earlier entries will make.
        let (plan, royalty) = {
            let state = self.state.read().await;
            let mut pending: HashMap<ItemId, Principal> = HashMap::new();
            let mut settled: HashSet<ItemId> = HashSet::new();
            let mut plan: Vec<(TransferRequest, Option<Amount>)> =
                Vec::with_capacity(entries.len());

            for entry in entries {
                if !state.ledger.exists(entry.id) {
                    return Err(EngineError::NotFound(entry.id));
                }
                let holder = match pending.get(&entry.id) {
                    Some(holder) => *holder,
                    None => state.ledger.holder_of(entry.id)?,
                };
                if holder != entry.from {
                    return Err(EngineError::not_owner(entry.from, entry.id));
                }
                state
                    .ledger
                    .require_transfer_authority(caller, entry.from, entry.id)?;

                let settlement = if state.marketplace.contains(&caller) {
                    None
                } else {
                    // An id settles at most once per batch; its record resets
                    // with the first settlement.
                    if !settled.insert(entry.id) {
                        return Err(EngineError::TransferNotAuthorizedBySale { id: entry.id });
                    }
                    Some(state.sales.clearance(entry.id, entry.to)?)
                };

                pending.insert(entry.id, entry.to);
                plan.push((*entry, settlement));
            }
            (plan, state.royalty)
        };

        // Phase 2: run every settlement before any state mutation; a failed
        // leg reclaims everything already disbursed and aborts the batch.
        let mut completed: Vec<(Principal, Amount)> = Vec::new();
        let mut settled_count = 0u64;
        let mut royalties_total: Amount = 0;
        for (entry, settlement) in &plan {
            let Some(price) = settlement else { continue };
            let (royalty_paid, legs) = settlement_legs(&royalty, entry.from, *price);
            for (recipient, amount) in legs {
                if let Err(err) = self.treasury.disburse(recipient, amount).await {
                    self.unwind(&completed).await;
                    self.stats.write().await.settlement_failures += 1;
                    return Err(err.into());
                }
                completed.push((recipient, amount));
            }
            settled_count += 1;
            royalties_total += royalty_paid;
        }

        // Phase 3: apply every mutation.
        {
            let mut state = self.state.write().await;
            for (entry, settlement) in &plan {
                if settlement.is_some() {
                    state.sales.complete(entry.id);
                }
                state.ledger.set_holder(entry.id, entry.to)?;
            }
        }

        let mut stats = self.stats.write().await;
        stats.transfers_completed += plan.len() as u64;
        stats.exempt_transfers += plan.len() as u64 - settled_count;
        stats.royalties_disbursed += royalties_total;
        drop(stats);

        if !plan.is_empty() {
            self.events.publish(EngineEvent::ItemsTransferredBatch(
                ItemsTransferredBatchPayload {
                    ids: plan.iter().map(|(entry, _)| entry.id).collect(),
                    settled: settled_count,
                },
            ));
        }
        info!(count = plan.len(), settled = settled_count, "batch transfer completed");
        Ok(())
    }

    async fn set_operator(
        &self,
        caller: Principal,
        operator: Principal,
        approved: bool,
    ) -> Result<(), EngineError> {
        self.state
            .write()
            .await
            .ledger
            .set_operator(caller, operator, approved);
        debug!(holder = %caller, operator = %operator, approved, "operator approval updated");
        Ok(())
    }

    // --- Item queries ---

    async fn item_exists(&self, id: ItemId) -> bool {
        self.state.read().await.ledger.exists(id)
    }

    async fn holder_of(&self, id: ItemId) -> Result<Principal, EngineError> {
        self.state.read().await.ledger.holder_of(id)
    }

    async fn minted(&self) -> u64 {
        self.state.read().await.ledger.minted()
    }

    async fn supply_cap(&self) -> u64 {
        self.state.read().await.ledger.supply_cap()
    }

    // --- Sales ---

    #[instrument(skip(self), fields(caller = %caller))]
    async fn set_price(
        &self,
        caller: Principal,
        id: ItemId,
        price: Amount,
    ) -> Result<(), EngineError> {
        let record = {
            let mut state = self.state.write().await;
            let holder = state.ledger.holder_of(id)?;
            if caller != holder {
                return Err(EngineError::not_owner(caller, id));
            }
            state.sales.set_price(id, price)?
        };
        self.events.publish(EngineEvent::PriceSet(PriceSetPayload {
            id,
            price,
            status: record.status,
        }));
        info!(id, price, status = ?record.status, "price set");
        Ok(())
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn purchase(
        &self,
        caller: Principal,
        id: ItemId,
        offered: Amount,
    ) -> Result<(), EngineError> {
        let _guard = self.enter().await?;

        // Commit the purchase before any external fund movement: a reentrant
        // read sees `InProgress`, never a half-updated record.
        let seller = {
            let mut state = self.state.write().await;
            let seller = state.ledger.holder_of(id)?;
            state.sales.begin_purchase(id, caller, offered)?;
            seller
        };
        debug!(id, offered, seller = %seller, "purchase committed, settling");

        let (price, royalty_paid) = self.finalize_sale(id, seller, caller).await?;

        let mut stats = self.stats.write().await;
        stats.transfers_completed += 1;
        stats.purchases_completed += 1;
        stats.royalties_disbursed += royalty_paid;
        drop(stats);

        self.events
            .publish(EngineEvent::ItemTransferred(ItemTransferredPayload {
                id,
                from: seller,
                to: caller,
                exempt: false,
            }));
        self.events
            .publish(EngineEvent::ItemPurchased(ItemPurchasedPayload {
                id,
                seller,
                buyer: caller,
                price,
                royalty_paid,
            }));
        info!(id, price, royalty_paid, "purchase settled");
        Ok(())
    }

    async fn get_price(&self, id: ItemId) -> Result<Amount, EngineError> {
        let state = self.state.read().await;
        if !state.ledger.exists(id) {
            return Err(EngineError::NotFound(id));
        }
        Ok(state.sales.record(id).price)
    }

    async fn get_status(&self, id: ItemId) -> Result<SaleStatus, EngineError> {
        let state = self.state.read().await;
        if !state.ledger.exists(id) {
            return Err(EngineError::NotFound(id));
        }
        Ok(state.sales.record(id).status)
    }

    // --- Royalty ---

    async fn set_royalty(
        &self,
        caller: Principal,
        recipient: Principal,
        rate_bps: u16,
    ) -> Result<(), EngineError> {
        let rate = BasisPoints::new(rate_bps).ok_or_else(|| EngineError::InvalidRoyalty {
            reason: format!("rate {rate_bps} exceeds {} bps", BasisPoints::MAX),
        })?;
        if recipient.is_zero() {
            return Err(EngineError::InvalidRoyalty {
                reason: "recipient must be non-zero".to_string(),
            });
        }

        {
            let mut state = self.state.write().await;
            state.roles.require(caller, Role::Admin)?;
            state.royalty = RoyaltyConfig::new(recipient, rate);
        }
        self.events.publish(EngineEvent::RoyaltyConfigChanged(
            RoyaltyConfigChangedPayload {
                recipient,
                rate_bps,
            },
        ));
        info!(recipient = %recipient, rate_bps, "royalty config changed");
        Ok(())
    }

    async fn royalty_owner(&self) -> Principal {
        self.state.read().await.royalty.recipient
    }

    async fn royalty_rate(&self) -> BasisPoints {
        self.state.read().await.royalty.rate
    }

    // --- Marketplace allowlist ---

    async fn set_marketplace(
        &self,
        caller: Principal,
        members: Vec<Principal>,
    ) -> Result<(), EngineError> {
        let members = {
            let mut state = self.state.write().await;
            state.roles.require(caller, Role::Admin)?;
            state.marketplace.replace(members);
            state.marketplace.members().to_vec()
        };
        self.events.publish(EngineEvent::MarketplaceListChanged(
            MarketplaceListChangedPayload { members },
        ));
        info!("marketplace allowlist replaced");
        Ok(())
    }

    async fn get_marketplace(&self) -> Vec<Principal> {
        self.state.read().await.marketplace.members().to_vec()
    }

    async fn clear_marketplace(&self, caller: Principal) -> Result<(), EngineError> {
        {
            let mut state = self.state.write().await;
            state.roles.require(caller, Role::Admin)?;
            state.marketplace.clear();
        }
        self.events.publish(EngineEvent::MarketplaceListChanged(
            MarketplaceListChangedPayload { members: Vec::new() },
        ));
        info!("marketplace allowlist cleared");
        Ok(())
    }

    // --- Notifications ---

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// An engine wired to the in-memory adapters: open treasury, nobody
/// proof-eligible, unlimited execution budget.
#[must_use]
pub fn create_test_service(
    config: ServiceConfig,
) -> AssetEngineService<InMemoryTreasury, StaticEligibility, UnmeteredExecution> {
    AssetEngineService::new(
        Arc::new(InMemoryTreasury::new()),
        Arc::new(StaticEligibility::none()),
        Arc::new(UnmeteredExecution),
        config,
    )
}

// =============================================================================
// TESTS
// =============================================================================
