//! Batch assembly and response re-alignment.
//!
//! Several logical calls travel as one JSON array; each request's `id` is its
//! slot index. The server may answer in any order, so responses are placed
//! back into slot order by id before the caller sees them. A fault in one
//! slot stays in that slot; it never shifts or poisons its neighbours.

use serde_json::Value;

use tix_core::error::GatewayError;

use crate::wire::{Request, Response};

/// Build the request array for a batch; slot `i` gets id `i`.
#[must_use]
pub fn build(calls: Vec<(String, Value)>) -> Vec<Request> {
    calls
        .into_iter()
        .enumerate()
        .map(|(slot, (method, params))| Request::new(slot, method, params))
        .collect()
}

/// Re-align responses into request order.
///
/// Missing or id-less responses leave their slot as a transport error;
/// duplicate ids keep the last answer.
#[must_use]
pub fn align(responses: Vec<Response>, expected: usize) -> Vec<Result<Value, GatewayError>> {
    let mut slots: Vec<Result<Value, GatewayError>> = (0..expected)
        .map(|slot| {
            Err(GatewayError::Transport(format!(
                "missing response for slot {slot}"
            )))
        })
        .collect();

    for response in responses {
        let Some(id) = response.id else { continue };
        let Some(slot) = slots.get_mut(id) else {
            continue;
        };
        *slot = response.into_result();
    }

    slots
}
