//! Batched JSON-RPC gateway client for tix.
//!
//! Implements [`tix_core::gateway::TicketGateway`] over blocking HTTP. The
//! interesting part is the batch layer: N logical calls travel as one round
//! trip and come back order-aligned, with per-slot faults isolated.

pub mod batch;
pub mod client;
pub mod wire;

pub use client::{RpcClient, RpcGateway};
