//! # Adversarial Scenarios
//!
//! Attacks through the engine's external boundaries.
