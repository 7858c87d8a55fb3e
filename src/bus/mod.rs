//! Data bus abstraction
//!
//! The anchor watch never owns vessel data. It reads the latest published
//! values from a pub/sub data bus, asks to be told when they change, and
//! publishes its derived values back. [`DataBus`] is the seam to that bus;
//! [`MemoryBus`] is an in-process implementation.
//!
//! Callbacks run on the thread that delivers the update and may call back
//! into the bus, so implementations must not hold internal borrows while a
//! callback runs.

pub mod error;
pub mod memory;

pub use error::{BusError, BusResult};
pub use memory::MemoryBus;

use serde_json::Value;

use crate::api::types::Delta;
use crate::core::SELF_CONTEXT;

/// Called when an established subscription's feed fails
pub type ErrorCallback = Box<dyn Fn(BusError)>;

/// Called, without payload, whenever a subscribed path changes
pub type UpdateCallback = Box<dyn Fn()>;

/// Latest value published on a path
#[derive(Debug, Clone, PartialEq)]
pub struct BusValue {
    pub value: Value,
}

/// Subscription request: a context and the paths of interest
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub context: String,
    pub paths: Vec<String>,
}

impl Subscription {
    /// Subscribe to `paths` on the own vessel
    pub fn for_self<S: AsRef<str>>(paths: &[S]) -> Self {
        Self {
            context: SELF_CONTEXT.to_string(),
            paths: paths.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

/// Cancellation token returned by [`DataBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u32);

impl SubscriptionHandle {
    pub(crate) fn new(id: u32) -> Self {
        SubscriptionHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Pub/sub data bus the anchor watch is embedded in
pub trait DataBus {
    /// Latest value on `path`, or `None` if nothing was ever published
    fn read(&self, path: &str) -> Option<BusValue>;

    /// Register interest in a set of paths.
    ///
    /// `on_update` runs after every change to one of the paths; `on_error`
    /// runs if the feed fails after the subscription was established.
    fn subscribe(
        &self,
        subscription: &Subscription,
        on_error: ErrorCallback,
        on_update: UpdateCallback,
    ) -> BusResult<SubscriptionHandle>;

    /// Release a subscription. No callback of it runs afterwards.
    fn unsubscribe(&self, handle: SubscriptionHandle) -> BusResult<()>;

    /// Publish a delta atomically
    fn publish(&self, delta: Delta) -> BusResult<()>;
}
