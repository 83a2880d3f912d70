//! # Notifications
//!
//! Payloads emitted synchronously on every successful mutation, and the
//! in-process broadcast bus observers subscribe to. Each emission is wrapped
//! in an envelope carrying a v4 UUID event identifier.

use crate::domain::value_objects::{Amount, ItemId, Principal, SaleStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Default broadcast channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

// =============================================================================
// PAYLOADS
// =============================================================================

/// A single item was created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMintedPayload {
    /// Assigned identifier.
    pub id: ItemId,
    /// Initial holder.
    pub holder: Principal,
}

/// A batch mint completed (possibly short of the requested count).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsMintedBatchPayload {
    /// First identifier actually minted.
    pub first: ItemId,
    /// Last identifier actually minted.
    pub last: ItemId,
    /// Holder of every minted item.
    pub holder: Principal,
    /// Count requested by the caller; compare with `last - first + 1`.
    pub requested: u64,
}

/// A single item was deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBurnedPayload {
    /// Retired identifier.
    pub id: ItemId,
    /// Holder at the time of deletion.
    pub holder: Principal,
}

/// A batch of items was deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsBurnedBatchPayload {
    /// Retired identifiers, in request order.
    pub ids: Vec<ItemId>,
}

/// Ownership of an item changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTransferredPayload {
    /// The item that moved.
    pub id: ItemId,
    /// Previous holder.
    pub from: Principal,
    /// New holder.
    pub to: Principal,
    /// True when the initiator's allowlist membership bypassed settlement.
    pub exempt: bool,
}

/// A batch transfer completed atomically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsTransferredBatchPayload {
    /// The items that moved, in request order.
    pub ids: Vec<ItemId>,
    /// How many entries settled through the royalty path.
    pub settled: u64,
}

/// An item was listed, repriced, or delisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSetPayload {
    /// The listed item.
    pub id: ItemId,
    /// New price (0 delists).
    pub price: Amount,
    /// Resulting sale status.
    pub status: SaleStatus,
}

/// A purchase settled and the item changed hands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPurchasedPayload {
    /// The purchased item.
    pub id: ItemId,
    /// Seller (holder before settlement).
    pub seller: Principal,
    /// Buyer (holder after settlement).
    pub buyer: Principal,
    /// Settlement base: what the buyer actually paid.
    pub price: Amount,
    /// Royalty cut disbursed out of `price`.
    pub royalty_paid: Amount,
}

/// Royalty recipient or rate changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyConfigChangedPayload {
    /// New recipient.
    pub recipient: Principal,
    /// New rate in basis points.
    pub rate_bps: u16,
}

/// The marketplace allowlist was replaced or cleared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceListChangedPayload {
    /// The full new list (empty after a clear).
    pub members: Vec<Principal>,
}

// =============================================================================
// EVENT ENUM + ENVELOPE
// =============================================================================

/// Every notification the engine emits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Item created.
    ItemMinted(ItemMintedPayload),
    /// Batch of items created.
    ItemsMintedBatch(ItemsMintedBatchPayload),
    /// Item deleted.
    ItemBurned(ItemBurnedPayload),
    /// Batch of items deleted.
    ItemsBurnedBatch(ItemsBurnedBatchPayload),
    /// Ownership changed.
    ItemTransferred(ItemTransferredPayload),
    /// Batch ownership change.
    ItemsTransferredBatch(ItemsTransferredBatchPayload),
    /// Listing changed.
    PriceSet(PriceSetPayload),
    /// Purchase settled.
    ItemPurchased(ItemPurchasedPayload),
    /// Royalty configuration changed.
    RoyaltyConfigChanged(RoyaltyConfigChangedPayload),
    /// Marketplace allowlist changed.
    MarketplaceListChanged(MarketplaceListChangedPayload),
}

/// Envelope wrapping each emission with its event identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event id (v4 UUID).
    pub event_id: Uuid,
    /// The notification payload.
    pub event: EngineEvent,
}

// =============================================================================
// EVENT BUS
// =============================================================================

/// In-process notification bus.
///
/// Uses `tokio::sync::broadcast` for multi-consumer semantics; publishing
/// with no subscribers is not an error. Suitable for single-process
/// deployments; distributed observers would bridge this to an external bus.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with an explicit channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Publish an event; returns the number of subscribers that received it.
    pub fn publish(&self, event: EngineEvent) -> usize {
        let envelope = EventEnvelope {
            event_id: Uuid::new_v4(),
            event,
        };
        debug!(event = ?envelope.event, event_id = %envelope.event_id, "notification");
        self.sender.send(envelope).map_or(0, |count| count)
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
