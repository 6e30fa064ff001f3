//! Configuration controller.
//!
//! One controller per mounted product surface. It owns the attribute
//! selection, debounces resolution of complete selections, drops results
//! for selections that are no longer live, and publishes a read model that
//! UI surfaces subscribe to.
//!
//! State transitions:
//!
//! ```text
//! Idle | Resolved | Failed --(incomplete change)--> Incomplete
//! Incomplete --(complete change)--> Resolving --(live result)--> Resolved | Failed
//! Resolving --(superseded result)--> unchanged
//! ```
//!
//! A complete selection already in the fallback table resolves immediately,
//! without waiting for the debounce.

use crate::cart::CartGateway;
use crate::config::{ConfiguratorConfig, Environment};
use crate::error::{CartError, ConfiguratorError, ResolutionError};
use crate::resolver::VariantResolver;
use crate::selection::AttributeSelectionStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use turbo_commerce::cart::CartSnapshot;
use turbo_commerce::catalog::{ProductConfig, Selection, StockState, Variant, VariantKey};
use turbo_commerce::{CommerceError, DimensionId, Money, ValueId, VariantId};

/// Identifies one dispatched resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionToken {
    /// Key of the selection being resolved.
    pub key: VariantKey,
    /// Selection change counter at dispatch.
    pub sequence: u64,
}

/// Resolution state of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    /// Nothing selected yet, or nothing to select.
    Idle,
    /// At least one dimension has no value.
    Incomplete,
    /// A complete selection is waiting for its variant.
    Resolving(ResolutionToken),
    /// The live selection resolved.
    Resolved(Variant),
    /// The live selection could not be resolved.
    Failed(ResolutionError),
}

/// Read model published to UI surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguratorView {
    pub state: ResolutionState,
    pub selection: Selection,
    pub selection_complete: bool,
    pub is_loading: bool,
    pub variant: Option<Variant>,
    pub error: Option<ResolutionError>,
    /// `has_default_variant || (selection_complete && variant.is_some() && !is_loading)`
    pub can_add_to_cart: bool,
    /// Variant price, or the product base price while unresolved.
    pub display_price: Money,
    /// Struck-through price, when higher than `display_price`.
    pub compare_at_price: Option<Money>,
    /// Variant name, or the selected value labels.
    pub label: String,
    pub stock: StockState,
}

impl ConfiguratorView {
    fn build(product: &ProductConfig, selection: &Selection, state: &ResolutionState) -> Self {
        let variant = match state {
            ResolutionState::Resolved(variant) => Some(variant.clone()),
            _ => None,
        };
        let error = match state {
            ResolutionState::Failed(error) => Some(error.clone()),
            _ => None,
        };
        let selection_complete = selection.is_complete(&product.dimensions);
        let is_loading = matches!(state, ResolutionState::Resolving(_));
        let can_add_to_cart = product.has_default_variant()
            || (selection_complete && variant.is_some() && !is_loading);

        let (display_price, compare_at_price) = match &variant {
            Some(v) => (v.price_after_discount, v.compare_at_price()),
            None => (
                product.base_price,
                product
                    .base_price_before_discount
                    .filter(|before| before.amount_cents > product.base_price.amount_cents),
            ),
        };

        let label = variant
            .as_ref()
            .and_then(|v| v.display_name.clone())
            .unwrap_or_else(|| {
                let selected = product.selection_label(selection);
                if selected.is_empty() {
                    product.name.clone()
                } else {
                    selected
                }
            });
        let stock = variant.as_ref().map(|v| v.stock).unwrap_or_default();

        Self {
            state: state.clone(),
            selection: selection.clone(),
            selection_complete,
            is_loading,
            variant,
            error,
            can_add_to_cart,
            display_price,
            compare_at_price,
            label,
            stock,
        }
    }
}

/// Controller options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Delay between the last qualifying change and the lookup.
    pub debounce: Duration,
    /// Decides how malformed product definitions are handled.
    pub environment: Environment,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            environment: Environment::Production,
        }
    }
}

impl From<&ConfiguratorConfig> for ControllerOptions {
    fn from(config: &ConfiguratorConfig) -> Self {
        Self {
            debounce: config.resolution.debounce(),
            environment: config.environment,
        }
    }
}

struct Inner {
    store: AttributeSelectionStore,
    state: ResolutionState,
    sequence: u64,
    debounce_task: Option<JoinHandle<()>>,
    mounted: bool,
}

struct Shared {
    product: ProductConfig,
    resolver: VariantResolver,
    debounce: Duration,
    runtime: Handle,
    inner: Mutex<Inner>,
    view: watch::Sender<ConfiguratorView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) -> ConfiguratorView {
        let view = ConfiguratorView::build(&self.product, inner.store.selection(), &inner.state);
        self.view.send_replace(view.clone());
        view
    }

    /// Apply a finished resolution if it belongs to the live dispatch.
    ///
    /// A key can be dispatched more than once (a value toggled off and on
    /// again); only the newest dispatch writes.
    fn apply(&self, token: ResolutionToken, result: Result<Variant, ResolutionError>) {
        let mut inner = self.lock();
        let live = inner.mounted
            && matches!(&inner.state, ResolutionState::Resolving(t) if *t == token);
        if !live {
            tracing::debug!(
                product_id = %self.product.id,
                variant_key = %token.key,
                sequence = token.sequence,
                "discarding superseded resolution"
            );
            return;
        }

        inner.state = match result {
            Ok(variant) => {
                tracing::debug!(product_id = %self.product.id, variant_key = %token.key, variant_id = %variant.id, "selection resolved");
                ResolutionState::Resolved(variant)
            }
            Err(error) => {
                tracing::debug!(product_id = %self.product.id, variant_key = %token.key, error = %error, "selection failed to resolve");
                ResolutionState::Failed(error)
            }
        };
        self.publish(&inner);
    }
}

/// Orchestrates selection, debounced resolution and the read model for one
/// product.
///
/// Must be created inside a Tokio runtime. Dropping the controller unmounts
/// it: pending and in-flight resolutions are abandoned and never write to it.
pub struct ConfigurationController {
    shared: Arc<Shared>,
}

impl ConfigurationController {
    /// Create a controller for `product`.
    ///
    /// A malformed product fails in development. In production it is
    /// degraded to a default-variant product so checkout is not blocked.
    pub fn new(
        mut product: ProductConfig,
        resolver: VariantResolver,
        options: ControllerOptions,
    ) -> Result<Self, ConfiguratorError> {
        let runtime = Handle::try_current().map_err(|e| ConfiguratorError::Runtime(e.to_string()))?;

        if let Err(e) = product.validate() {
            if options.environment == Environment::Development {
                return Err(e.into());
            }
            tracing::warn!(product_id = %product.id, error = %e, "malformed product, treating as default variant");
            product.dimensions.clear();
            if product.default_variant_id.is_none() {
                product.default_variant_id = Some(VariantId::new(product.id.as_str()));
            }
        }

        resolver.seed(&product);

        let store = AttributeSelectionStore::new();
        let state = ResolutionState::Idle;
        let (view, _) = watch::channel(ConfiguratorView::build(&product, store.selection(), &state));

        Ok(Self {
            shared: Arc::new(Shared {
                product,
                resolver,
                debounce: options.debounce,
                runtime,
                inner: Mutex::new(Inner {
                    store,
                    state,
                    sequence: 0,
                    debounce_task: None,
                    mounted: true,
                }),
                view,
            }),
        })
    }

    /// The (possibly degraded) product definition.
    pub fn product(&self) -> &ProductConfig {
        &self.shared.product
    }

    /// Toggle a value and return the resulting read model.
    ///
    /// Unknown dimensions or values are rejected and leave the state
    /// untouched.
    pub fn select(
        &self,
        dimension: DimensionId,
        value: ValueId,
    ) -> Result<ConfiguratorView, CommerceError> {
        self.shared.product.check_value(&dimension, &value)?;

        let mut inner = self.shared.lock();
        if !inner.mounted {
            return Ok(self.view());
        }
        inner.store.select(dimension, value);
        Ok(self.recompute(&mut inner, self.shared.debounce))
    }

    /// Drop the whole selection.
    pub fn reset(&self) -> ConfiguratorView {
        let mut inner = self.shared.lock();
        if !inner.mounted {
            return self.view();
        }
        inner.store.clear();
        self.recompute(&mut inner, self.shared.debounce)
    }

    /// Resolve the live selection again after a failure, without waiting
    /// for the debounce.
    pub fn retry(&self) -> ConfiguratorView {
        let mut inner = self.shared.lock();
        if !inner.mounted || !matches!(inner.state, ResolutionState::Failed(_)) {
            return self.view();
        }
        self.recompute(&mut inner, Duration::ZERO)
    }

    /// Current read model.
    pub fn view(&self) -> ConfiguratorView {
        self.shared.view.borrow().clone()
    }

    /// Subscribe to read model changes.
    pub fn subscribe(&self) -> watch::Receiver<ConfiguratorView> {
        self.shared.view.subscribe()
    }

    /// Item id to submit to the cart, when the read model allows it.
    pub fn purchasable_item(&self) -> Option<VariantId> {
        let view = self.view();
        if !view.can_add_to_cart {
            return None;
        }
        view.variant
            .map(|v| v.id)
            .or_else(|| self.shared.product.default_variant_id.clone())
    }

    /// Submit the purchasable item to the cart.
    pub async fn add_to_cart(
        &self,
        gateway: &CartGateway,
        quantity: i64,
        note: &str,
    ) -> Result<CartSnapshot, CartError> {
        let item = self.purchasable_item().ok_or_else(|| {
            CartError::Validation("Please select all options before adding to cart.".to_string())
        })?;
        gateway.add_to_cart(&item, quantity, note).await
    }

    /// Stop publishing. Pending and in-flight resolutions are ignored.
    pub fn unmount(&self) {
        let mut inner = self.shared.lock();
        if !inner.mounted {
            return;
        }
        inner.mounted = false;
        inner.sequence += 1;
        if let Some(task) = inner.debounce_task.take() {
            task.abort();
        }
        tracing::debug!(product_id = %self.shared.product.id, "configurator unmounted");
    }

    /// Move to the state implied by the current selection and publish it.
    fn recompute(&self, inner: &mut Inner, delay: Duration) -> ConfiguratorView {
        inner.sequence += 1;
        if let Some(task) = inner.debounce_task.take() {
            task.abort();
        }

        let product = &self.shared.product;
        let selection = inner.store.selection();

        inner.state = if product.dimensions.is_empty() {
            ResolutionState::Idle
        } else if !selection.is_complete(&product.dimensions) {
            ResolutionState::Incomplete
        } else {
            let key = selection.key();
            match self.shared.resolver.cached(&product.id, &key) {
                Some(variant) => {
                    tracing::debug!(product_id = %product.id, variant_key = %key, "selection resolved from fallback table");
                    ResolutionState::Resolved(variant)
                }
                None => {
                    let token = ResolutionToken {
                        key,
                        sequence: inner.sequence,
                    };
                    tracing::debug!(
                        product_id = %product.id,
                        variant_key = %token.key,
                        sequence = token.sequence,
                        delay_ms = delay.as_millis() as u64,
                        "resolution scheduled"
                    );
                    inner.debounce_task = Some(self.schedule(token.clone(), delay));
                    ResolutionState::Resolving(token)
                }
            }
        };

        self.shared.publish(inner)
    }

    /// Resolve `token` after `delay`, unless the selection changes first.
    ///
    /// The task holds only a weak reference, so a dropped controller is
    /// never written to. Once the delay has passed the task detaches its own
    /// handle: later selection changes supersede the result instead of
    /// cancelling the lookup.
    fn schedule(&self, token: ResolutionToken, delay: Duration) -> JoinHandle<()> {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        self.shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let (resolver, product_id, selection) = {
                let Some(shared) = weak.upgrade() else { return };
                let mut inner = shared.lock();
                if !inner.mounted || inner.sequence != token.sequence {
                    return;
                }
                inner.debounce_task = None;
                (
                    shared.resolver.clone(),
                    shared.product.id.clone(),
                    inner.store.selection().clone(),
                )
            };

            tracing::debug!(product_id = %product_id, variant_key = %token.key, sequence = token.sequence, "resolving selection");
            let result = resolver.resolve(&product_id, &selection).await;

            if let Some(shared) = weak.upgrade() {
                shared.apply(token, result);
            }
        })
    }
}

impl Drop for ConfigurationController {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::catalog::{CatalogApi, VariantLookup};
    use crate::testing::ScriptedTransport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use turbo_commerce::catalog::{AttributeDimension, AttributeKind, AttributeValue};
    use turbo_commerce::{Currency, ProductId};

    /// Answers by variant key after a per-key delay and records every call.
    ///
    /// Replies for a key are served in order; the last one repeats.
    #[derive(Default)]
    struct FakeLookup {
        replies: HashMap<String, Vec<(Duration, Result<Variant, ResolutionError>)>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn reply(
            mut self,
            key: &str,
            delay_ms: u64,
            result: Result<Variant, ResolutionError>,
        ) -> Self {
            self.replies
                .entry(key.to_string())
                .or_default()
                .push((Duration::from_millis(delay_ms), result));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VariantLookup for FakeLookup {
        async fn lookup(
            &self,
            _: &ProductId,
            selection: &Selection,
        ) -> Result<Variant, ResolutionError> {
            let key = selection.key().as_str().to_string();
            let attempt = {
                let mut calls = self.calls.lock().unwrap();
                let attempt = calls.iter().filter(|k| **k == key).count();
                calls.push(key.clone());
                attempt
            };
            let reply = self
                .replies
                .get(&key)
                .and_then(|replies| replies.get(attempt).or_else(|| replies.last()));
            match reply {
                Some((delay, result)) => {
                    tokio::time::sleep(*delay).await;
                    result.clone()
                }
                None => Err(ResolutionError::NotFound),
            }
        }
    }

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn shirt() -> ProductConfig {
        ProductConfig::new("12", "Shirt", usd(5000))
            .with_dimension(
                AttributeDimension::new("size", "Size", AttributeKind::TextToken)
                    .with_value(AttributeValue::new("s", "S"))
                    .with_value(AttributeValue::new("m", "M"))
                    .with_value(AttributeValue::new("l", "L")),
            )
            .with_dimension(
                AttributeDimension::new("color", "Color", AttributeKind::Swatch)
                    .with_value(AttributeValue::new("red", "Red").with_color("#ff0000"))
                    .with_value(AttributeValue::new("blue", "Blue").with_color("#0000ff")),
            )
    }

    fn controller(product: ProductConfig, lookup: Arc<FakeLookup>) -> ConfigurationController {
        ConfigurationController::new(
            product,
            VariantResolver::new(lookup),
            ControllerOptions::default(),
        )
        .unwrap()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_size_then_color_scenario() {
        let lookup = Arc::new(FakeLookup::default().reply(
            "color:red|size:m",
            100,
            Ok(Variant::new("99", usd(6000))),
        ));
        let controller = controller(shirt(), lookup.clone());
        assert_eq!(controller.view().state, ResolutionState::Idle);

        let view = controller.select("size".into(), "m".into()).unwrap();
        assert_eq!(view.state, ResolutionState::Incomplete);
        assert!(!view.selection_complete);
        assert!(!view.can_add_to_cart);
        assert_eq!(view.display_price, usd(5000));
        assert_eq!(view.label, "M");

        let view = controller.select("color".into(), "red".into()).unwrap();
        assert!(matches!(view.state, ResolutionState::Resolving(_)));
        assert!(view.is_loading);
        assert!(!view.can_add_to_cart);

        settle().await;
        let view = controller.view();
        assert_eq!(view.variant.as_ref().unwrap().id.as_str(), "99");
        assert_eq!(view.display_price, usd(6000));
        assert!(view.can_add_to_cart);
        assert_eq!(view.label, "M / Red");

        let view = controller.select("color".into(), "red".into()).unwrap();
        assert_eq!(view.state, ResolutionState::Incomplete);
        assert!(view.variant.is_none());
        assert_eq!(view.display_price, usd(5000));
        assert!(!view.can_add_to_cart);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_selections_issue_one_lookup() {
        let lookup = Arc::new(FakeLookup::default().reply(
            "color:blue|size:l",
            50,
            Ok(Variant::new("7", usd(5500))),
        ));
        let controller = controller(shirt(), lookup.clone());

        controller.select("size".into(), "s".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.select("color".into(), "blue".into()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.select("size".into(), "l".into()).unwrap();

        settle().await;
        assert_eq!(lookup.calls(), vec!["color:blue|size:l".to_string()]);
        assert_eq!(controller.view().variant.unwrap().id.as_str(), "7");
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_for_superseded_selection_is_dropped() {
        let lookup = Arc::new(
            FakeLookup::default()
                .reply("color:red|size:m", 2_000, Ok(Variant::new("A", usd(1000))))
                .reply("color:blue|size:m", 100, Ok(Variant::new("B", usd(2000)))),
        );
        let controller = controller(shirt(), lookup.clone());

        controller.select("size".into(), "m".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        // Let A's lookup start, then switch to B while it is in flight.
        tokio::time::sleep(Duration::from_millis(600)).await;
        controller.select("color".into(), "blue".into()).unwrap();

        settle().await;
        assert_eq!(lookup.calls().len(), 2);
        let view = controller.view();
        assert_eq!(view.variant.unwrap().id.as_str(), "B");
        assert!(view.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_failure_does_not_flicker() {
        let lookup = Arc::new(
            FakeLookup::default()
                .reply(
                    "color:red|size:m",
                    2_000,
                    Err(ResolutionError::Network("timeout".into())),
                )
                .reply("color:blue|size:m", 100, Ok(Variant::new("B", usd(2000)))),
        );
        let controller = controller(shirt(), lookup);
        let mut views = controller.subscribe();

        controller.select("size".into(), "m".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        controller.select("color".into(), "blue".into()).unwrap();

        settle().await;
        assert!(views.has_changed().unwrap());
        let view = views.borrow_and_update().clone();
        assert!(matches!(view.state, ResolutionState::Resolved(_)));
        assert!(view.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselected_key_ignores_older_dispatch() {
        let lookup = Arc::new(
            FakeLookup::default()
                .reply(
                    "color:red|size:m",
                    200,
                    Err(ResolutionError::Network("reset".into())),
                )
                .reply("color:red|size:m", 200, Ok(Variant::new("99", usd(6000)))),
        );
        let controller = controller(shirt(), lookup.clone());

        controller.select("size".into(), "m".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        // Let the first lookup start, then toggle back to the same selection.
        tokio::time::sleep(Duration::from_millis(600)).await;
        controller.select("color".into(), "red".into()).unwrap();
        let view = controller.select("color".into(), "red".into()).unwrap();
        assert!(view.is_loading);

        // The first dispatch fails while the second is still debouncing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(controller.view().is_loading);
        assert!(controller.view().error.is_none());

        settle().await;
        assert_eq!(lookup.calls().len(), 2);
        let view = controller.view();
        assert_eq!(view.variant.unwrap().id.as_str(), "99");
        assert!(view.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_recovered_into_read_model() {
        let lookup = Arc::new(FakeLookup::default().reply(
            "color:red|size:s",
            10,
            Err(ResolutionError::Network("timeout".into())),
        ));
        let controller = controller(shirt(), lookup.clone());

        controller.select("size".into(), "s".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        settle().await;
        let view = controller.view();
        assert_eq!(view.error, Some(ResolutionError::Network("timeout".into())));
        assert!(!view.can_add_to_cart);
        assert!(controller.purchasable_item().is_none());

        let view = controller.retry();
        assert!(view.is_loading);
        settle().await;
        assert_eq!(lookup.calls().len(), 2);

        controller.select("size".into(), "l".into()).unwrap();
        settle().await;
        assert_eq!(controller.view().error, Some(ResolutionError::NotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_key_is_served_from_table() {
        let lookup = Arc::new(FakeLookup::default().reply(
            "color:red|size:m",
            10,
            Ok(Variant::new("99", usd(6000))),
        ));
        let controller = controller(shirt(), lookup.clone());

        controller.select("size".into(), "m".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        settle().await;

        controller.select("color".into(), "red".into()).unwrap();
        let view = controller.select("color".into(), "red".into()).unwrap();
        assert_eq!(view.variant.unwrap().id.as_str(), "99");
        assert!(!view.is_loading);

        settle().await;
        assert_eq!(lookup.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_resolution_end_to_end() {
        let transport = ScriptedTransport::json(vec![(
            200,
            json!({"status": true, "data": {"id": 99, "price_after_discount": "75.00"}}),
        )]);
        let resolver = VariantResolver::new(Arc::new(CatalogApi::new(
            transport.client(),
            Currency::USD,
        )));
        let product = ProductConfig::new("12", "Shirt", usd(5000))
            .with_dimension(
                AttributeDimension::new("1", "Size", AttributeKind::TextToken)
                    .with_value(AttributeValue::new("3", "M")),
            )
            .with_dimension(
                AttributeDimension::new("2", "Color", AttributeKind::Swatch)
                    .with_value(AttributeValue::new("7", "Red")),
            );
        let controller =
            ConfigurationController::new(product, resolver.clone(), ControllerOptions::default())
                .unwrap();

        controller.select("2".into(), "7".into()).unwrap();
        controller.select("1".into(), "3".into()).unwrap();
        settle().await;

        let view = controller.view();
        assert_eq!(view.variant.as_ref().unwrap().id.as_str(), "99");
        assert_eq!(view.display_price.display_amount(), "75.00");

        let key = view.selection.key();
        assert_eq!(key.as_str(), "1:3|2:7");
        let cached = resolver.cached(&ProductId::new("12"), &key).unwrap();
        assert_eq!(cached.id.as_str(), "99");

        controller.select("1".into(), "3".into()).unwrap();
        controller.select("1".into(), "3".into()).unwrap();
        settle().await;
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_values_are_rejected() {
        let controller = controller(shirt(), Arc::new(FakeLookup::default()));
        controller.select("size".into(), "m".into()).unwrap();

        let err = controller.select("material".into(), "silk".into()).unwrap_err();
        assert_eq!(err, CommerceError::UnknownDimension("material".into()));
        let err = controller.select("size".into(), "xxl".into()).unwrap_err();
        assert!(matches!(err, CommerceError::UnknownValue { .. }));

        assert_eq!(controller.view().selection.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_variant_is_always_purchasable() {
        let product = shirt().with_default_variant("500");
        let controller = controller(product, Arc::new(FakeLookup::default()));

        let view = controller.select("size".into(), "m".into()).unwrap();
        assert!(!view.selection_complete);
        assert!(view.can_add_to_cart);
        assert_eq!(controller.purchasable_item(), Some(VariantId::new("500")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_product_policy() {
        let broken = ProductConfig::new("12", "Mystery box", usd(2500));

        let err = ConfigurationController::new(
            broken.clone(),
            VariantResolver::new(Arc::new(FakeLookup::default())),
            ControllerOptions {
                environment: Environment::Development,
                ..ControllerOptions::default()
            },
        );
        assert!(matches!(err, Err(ConfiguratorError::Commerce(_))));

        let controller = controller(broken, Arc::new(FakeLookup::default()));
        let view = controller.view();
        assert_eq!(view.state, ResolutionState::Idle);
        assert!(view.can_add_to_cart);
        assert_eq!(controller.purchasable_item(), Some(VariantId::new("12")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_selection() {
        let controller = controller(shirt(), Arc::new(FakeLookup::default()));
        controller.select("size".into(), "m".into()).unwrap();

        let view = controller.reset();
        assert!(view.selection.is_empty());
        assert_eq!(view.state, ResolutionState::Incomplete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_abandons_in_flight_resolution() {
        let lookup = Arc::new(FakeLookup::default().reply(
            "color:red|size:m",
            1_000,
            Ok(Variant::new("99", usd(6000))),
        ));
        let controller = controller(shirt(), lookup.clone());

        controller.select("size".into(), "m".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        controller.unmount();

        settle().await;
        assert_eq!(lookup.calls().len(), 1);
        assert!(controller.view().is_loading);
        assert!(controller.view().variant.is_none());

        drop(controller);
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_to_cart_through_controller() {
        let lookup = Arc::new(FakeLookup::default().reply(
            "color:red|size:m",
            10,
            Ok(Variant::new("42", usd(7500))),
        ));
        let controller = controller(shirt(), lookup);
        let transport = ScriptedTransport::json(vec![(
            200,
            json!({"status": true, "data": {
                "lines": [{"item_id": 42, "qty": 1}],
                "subtotal": "75.00",
                "grand_total": "75.00"
            }}),
        )]);
        let gateway =
            CartGateway::new(transport.client(), TokenStore::with_token("tok"), Currency::USD);

        let err = controller.add_to_cart(&gateway, 1, "").await.unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert!(transport.requests().is_empty());

        controller.select("size".into(), "m".into()).unwrap();
        controller.select("color".into(), "red".into()).unwrap();
        settle().await;

        let snapshot = controller.add_to_cart(&gateway, 1, "").await.unwrap();
        assert_eq!(snapshot.line(&VariantId::new("42")).unwrap().quantity, 1);
        assert_eq!(gateway.state().snapshot(), snapshot);
    }
}
