use tracing::debug;

use crate::holder::StateHolder;

/// Single slot carrying the holder from a torn-down instance to its successor.
///
/// Every `put` replaces the payload; `take` empties the slot, so a holder is
/// consumed at most once.
#[derive(Debug, Default)]
pub struct TransientChannel {
    payload: Option<StateHolder>,
}

impl TransientChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, holder: StateHolder) {
        if self.payload.replace(holder).is_some() {
            debug!("replaced an unconsumed holder");
        }
    }

    pub fn take(&mut self) -> Option<StateHolder> {
        self.payload.take()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}
