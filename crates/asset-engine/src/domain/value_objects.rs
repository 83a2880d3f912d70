//! # Value Objects
//!
//! Immutable domain primitives for the asset engine.
//! These types represent concepts defined by their value, not identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Item identifier. Dense, assigned by an auto-increment counter starting at 0.
pub type ItemId = u64;

/// Fund amount, in the smallest unit of the deployment's currency.
pub type Amount = u64;

/// A 32-byte hash, used for opaque eligibility-proof nodes.
pub type Hash = [u8; 32];

// =============================================================================
// PRINCIPAL (20 bytes)
// =============================================================================

/// A 20-byte principal identity.
///
/// A principal is any external identity capable of initiating operations and
/// receiving funds. The zero principal is reserved as "none".
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Principal(pub [u8; 20]);

impl Principal {
    /// The zero principal (reserved, never a valid recipient).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates a principal from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates a principal from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero principal.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Principal {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Principal> for [u8; 20] {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Named roles gating engine mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Top-level administration: role management, royalty and marketplace
    /// configuration, batch deletion.
    Admin,
    /// Permission to mint new items.
    Minter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Minter => write!(f, "MINTER"),
        }
    }
}

// =============================================================================
// SALE STATUS
// =============================================================================

/// Per-item sale state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    /// Not listed. Initial state; re-entered after every completed sale.
    #[default]
    NotForSale,
    /// Listed at the recorded price, awaiting a buyer.
    ForSale,
    /// A buyer committed; settlement and transfer pending.
    InProgress,
}

impl SaleStatus {
    /// Check if transition is valid.
    ///
    /// `InProgress` only exits through a completed settlement; in particular
    /// the holder cannot relist or delist while a purchase is pending.
    #[must_use]
    pub fn can_transition_to(&self, next: SaleStatus) -> bool {
        match (self, next) {
            // Listing, repricing, delisting.
            (Self::NotForSale, Self::ForSale) => true,
            (Self::ForSale, Self::ForSale) => true,
            (Self::ForSale, Self::NotForSale) => true,
            (Self::NotForSale, Self::NotForSale) => true,
            // Purchase commitment and settlement completion.
            (Self::ForSale, Self::InProgress) => true,
            (Self::InProgress, Self::NotForSale) => true,
            _ => false,
        }
    }

    /// Check if the item is currently offered or mid-sale.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::NotForSale)
    }
}

// =============================================================================
// BASIS POINTS
// =============================================================================

/// A royalty rate in basis points (1/100th of a percent), 0–10_000 inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// The maximum rate: 10_000 bps = 100%.
    pub const MAX: u16 = 10_000;

    /// Creates a rate, or None if above 10_000 bps.
    #[must_use]
    pub const fn new(bps: u16) -> Option<Self> {
        if bps <= Self::MAX {
            Some(Self(bps))
        } else {
            None
        }
    }

    /// Returns the raw basis-point value.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true for a 0 bps rate.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
