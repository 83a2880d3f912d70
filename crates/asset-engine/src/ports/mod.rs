//! # Ports
//!
//! Inbound (driving) and outbound (driven) boundaries of the engine.

pub mod inbound;
pub mod outbound;

pub use inbound::{AssetEngineApi, BatchMintOutcome, TransferRequest};
pub use outbound::{ExecutionMeter, FundDisburser, MintEligibility, MockDisburser};
