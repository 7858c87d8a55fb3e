//! In-memory data bus for testing and replay

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::api::types::Delta;
use crate::bus::{
    BusError, BusResult, BusValue, DataBus, ErrorCallback, Subscription, SubscriptionHandle,
    UpdateCallback,
};

struct Subscriber {
    handle: SubscriptionHandle,
    subscription: Subscription,
    on_error: Rc<dyn Fn(BusError)>,
    on_update: Rc<dyn Fn()>,
}

/// Single-threaded data bus that keeps the latest value of every path.
///
/// Callbacks are invoked synchronously from [`MemoryBus::set`] and
/// [`DataBus::publish`], in registration order, with no internal borrow held.
#[derive(Default)]
pub struct MemoryBus {
    values: RefCell<HashMap<String, Value>>,
    subscribers: RefCell<Vec<Subscriber>>,
    published: RefCell<Vec<Delta>>,
    next_handle: Cell<u32>,
    disconnected: Cell<bool>,
}

impl MemoryBus {
    /// Create an empty, connected bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` on `path` and notify the subscribers of that path
    pub fn set(&self, path: &str, value: Value) {
        self.values.borrow_mut().insert(path.to_string(), value);
        self.notify(&[path]);
    }

    /// Store `value` on `path` without notifying anyone
    pub fn seed(&self, path: &str, value: Value) {
        self.values.borrow_mut().insert(path.to_string(), value);
    }

    /// Forget the value on `path` and notify its subscribers
    pub fn remove(&self, path: &str) {
        self.values.borrow_mut().remove(path);
        self.notify(&[path]);
    }

    /// Deliver a feed failure to every subscriber's error callback
    pub fn fail(&self, message: &str) {
        let callbacks: Vec<Rc<dyn Fn(BusError)>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| Rc::clone(&s.on_error))
            .collect();

        for on_error in callbacks {
            on_error(BusError::Feed {
                message: message.to_string(),
            });
        }
    }

    /// Simulate losing the bus. Subscribing and publishing fail until
    /// [`MemoryBus::reconnect`] is called; stored values stay readable.
    pub fn disconnect(&self) {
        self.disconnected.set(true);
    }

    pub fn reconnect(&self) {
        self.disconnected.set(false);
    }

    /// Every delta published so far, oldest first
    pub fn published(&self) -> Vec<Delta> {
        self.published.borrow().clone()
    }

    /// Most recently published delta
    pub fn last_published(&self) -> Option<Delta> {
        self.published.borrow().last().cloned()
    }

    pub fn clear_published(&self) {
        self.published.borrow_mut().clear();
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn is_subscribed(&self, handle: SubscriptionHandle) -> bool {
        self.subscribers.borrow().iter().any(|s| s.handle == handle)
    }

    fn notify(&self, paths: &[&str]) {
        let callbacks: Vec<(SubscriptionHandle, Rc<dyn Fn()>)> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| paths.iter().any(|p| s.subscription.contains(p)))
            .map(|s| (s.handle, Rc::clone(&s.on_update)))
            .collect();

        for (handle, on_update) in callbacks {
            // An earlier callback may have cancelled this subscription
            if self.is_subscribed(handle) {
                on_update();
            }
        }
    }
}

impl DataBus for MemoryBus {
    fn read(&self, path: &str) -> Option<BusValue> {
        self.values
            .borrow()
            .get(path)
            .map(|value| BusValue { value: value.clone() })
    }

    fn subscribe(
        &self,
        subscription: &Subscription,
        on_error: ErrorCallback,
        on_update: UpdateCallback,
    ) -> BusResult<SubscriptionHandle> {
        if self.disconnected.get() {
            return Err(BusError::Disconnected);
        }

        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);
        let handle = SubscriptionHandle::new(id);

        self.subscribers.borrow_mut().push(Subscriber {
            handle,
            subscription: subscription.clone(),
            on_error: Rc::from(on_error),
            on_update: Rc::from(on_update),
        });
        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) -> BusResult<()> {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.handle != handle);

        if subscribers.len() == before {
            return Err(BusError::UnknownSubscription { handle: handle.id() });
        }
        Ok(())
    }

    fn publish(&self, delta: Delta) -> BusResult<()> {
        if self.disconnected.get() {
            return Err(BusError::Disconnected);
        }

        let paths: Vec<String> = delta.values().map(|pv| pv.path.clone()).collect();
        {
            let mut values = self.values.borrow_mut();
            for pv in delta.values() {
                values.insert(pv.path.clone(), pv.value.clone());
            }
        }
        self.published.borrow_mut().push(delta);

        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        self.notify(&paths);
        Ok(())
    }
}
