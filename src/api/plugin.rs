//! Plugin lifecycle for hosting the anchor watch on a data bus
//!
//! [`AnchorAlarmPlugin::start`] evaluates once, then subscribes to the
//! input paths and re-evaluates on every notification. Each evaluation reads
//! a fresh snapshot from the bus and publishes one delta.
//! [`AnchorAlarmPlugin::stop`] releases every subscription the plugin owns.

use std::rc::Rc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::bus::{BusError, DataBus, Subscription, SubscriptionHandle};
use crate::core::INPUT_PATHS;
use crate::processing::evaluator::{evaluate, EvaluationResult};
use crate::processing::resolve::{resolve_anchor, resolve_vessel};
use crate::utils::config::PluginConfig;

/// Read, evaluate and publish once. Publish failures are logged.
pub fn run_cycle<B: DataBus + ?Sized>(bus: &B, source: &str) -> EvaluationResult {
    let vessel = resolve_vessel(bus);
    let anchor = resolve_anchor(bus);
    let result = evaluate(&vessel, &anchor);

    if let Err(e) = bus.publish(result.to_delta(source)) {
        error!(error = %e, "Failed to publish anchor watch update");
    }
    result
}

/// Anchor alarm hosted on a data bus
pub struct AnchorAlarmPlugin<B: DataBus + 'static> {
    bus: Rc<B>,
    /// Settings of the current run, `None` while stopped
    config: Option<PluginConfig>,
    subscriptions: Vec<SubscriptionHandle>,
}

impl<B: DataBus + 'static> AnchorAlarmPlugin<B> {
    pub const ID: &'static str = "signalk-anchoralarm-headless-plugin";
    pub const NAME: &'static str = "Anchor Alarm (Headless)";

    pub fn new(bus: Rc<B>) -> Self {
        Self {
            bus,
            config: None,
            subscriptions: Vec::new(),
        }
    }

    /// Settings schema presented to the host
    pub fn schema() -> Value {
        PluginConfig::schema()
    }

    /// Start watching. A running plugin is stopped and started again.
    ///
    /// A failed subscription is logged and does not abort the start; the
    /// eager evaluation has been published either way.
    pub fn start(&mut self, config: PluginConfig) {
        if self.is_running() {
            self.stop();
        }
        info!(plugin = Self::ID, name = Self::NAME, "Starting anchor watch");

        run_cycle(&*self.bus, Self::ID);

        let weak = Rc::downgrade(&self.bus);
        let on_update = Box::new(move || {
            if let Some(bus) = weak.upgrade() {
                run_cycle(&*bus, Self::ID);
            }
        });
        let on_error = Box::new(|e: BusError| {
            error!("Error: {}", e);
        });

        match self
            .bus
            .subscribe(&Subscription::for_self(&INPUT_PATHS), on_error, on_update)
        {
            Ok(handle) => self.subscriptions.push(handle),
            Err(e) => error!("Error: {}", e),
        }

        self.config = Some(config);
    }

    /// Release every subscription. Calling it again is a no-op.
    pub fn stop(&mut self) {
        for handle in self.subscriptions.drain(..) {
            if let Err(e) = self.bus.unsubscribe(handle) {
                warn!(handle = handle.id(), error = %e, "Failed to release subscription");
            }
        }

        if self.config.take().is_some() {
            info!(plugin = Self::ID, "Stopped anchor watch");
        }
    }

    /// Evaluate and publish immediately, outside of any notification
    pub fn evaluate_now(&self) -> EvaluationResult {
        run_cycle(&*self.bus, Self::ID)
    }

    pub fn is_running(&self) -> bool {
        self.config.is_some()
    }

    /// Number of subscriptions currently owned
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl<B: DataBus + 'static> Drop for AnchorAlarmPlugin<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
