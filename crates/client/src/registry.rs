//! Subscription registry: slot index ↔ dataref mapping plus the most
//! recently observed value per dataref.
//!
//! The registry is the only state touched from two execution contexts: the
//! caller replaces it wholesale on re-subscription, and the listener task
//! updates individual entries per inbound record. One mutex guards both so
//! a replace and an update can never interleave into a half-old/half-new
//! map. The lock is only ever held for the map mutation itself, never
//! across a receive.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;
use xplane_connect_protocol::ProtocolError;

/// The most recent value seen for a subscribed dataref.
///
/// Both fields start out `None` when the subscription is created and are
/// set together the first time a matching record arrives. A stale
/// timestamp is the only visible symptom of UDP loss; callers that need
/// freshness must compare timestamps themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObservedValue {
    /// Last value streamed by the simulator, single precision on the wire.
    pub value: Option<f32>,
    /// When that value was processed by the listener.
    pub timestamp: Option<Instant>,
}

#[derive(Default)]
struct RegistryState {
    /// Slot index → dataref, built at subscribe time. Every slot that can
    /// legally appear in an inbound packet is in here.
    reverse_index: HashMap<i32, String>,
    values: HashMap<String, ObservedValue>,
}

/// Shared slot/value table behind a single mutex.
#[derive(Default)]
pub struct DatarefRegistry {
    state: Mutex<RegistryState>,
}

impl DatarefRegistry {
    /// Replace the whole table. Slots are assigned as the 1-based position
    /// in `datarefs`; previous subscriptions and observed values are gone.
    pub fn replace(&self, datarefs: &[String]) {
        let mut state = self.state.lock();
        state.reverse_index = datarefs
            .iter()
            .enumerate()
            .map(|(i, dataref)| (i as i32 + 1, dataref.clone()))
            .collect();
        state.values = datarefs
            .iter()
            .map(|dataref| (dataref.clone(), ObservedValue::default()))
            .collect();
    }

    /// Record one inbound slot/value pair.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownSlot`] if the slot has no registered
    /// dataref; no value is mutated in that case.
    pub fn record(&self, slot: i32, value: f32, timestamp: Instant) -> Result<(), ProtocolError> {
        let mut state = self.state.lock();
        let dataref = state
            .reverse_index
            .get(&slot)
            .cloned()
            .ok_or(ProtocolError::UnknownSlot { slot })?;
        state.values.insert(
            dataref,
            ObservedValue {
                value: Some(value),
                timestamp: Some(timestamp),
            },
        );
        Ok(())
    }

    /// Clone of the current dataref → observed-value map.
    pub fn snapshot(&self) -> HashMap<String, ObservedValue> {
        self.state.lock().values.clone()
    }

    /// Number of active subscriptions, which is also the highest assigned
    /// slot index.
    pub fn subscription_count(&self) -> usize {
        self.state.lock().reverse_index.len()
    }
}
