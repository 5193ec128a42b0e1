//! Mock coupon provider for testing.
//!
//! Provides an in-memory implementation of `CouponProvider` for unit
//! and integration tests. Supports:
//! - Seeded coupons
//! - Error injection
//! - Call tracking

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::pricing::{Coupon, CreateCouponRequest};
use crate::ports::{CouponProvider, DeletedCoupon, PaymentError};

/// Mock coupon provider for testing.
///
/// Behaves like Stripe for the coupon calls the crate makes: IDs are unique,
/// deleted coupons disappear, a deleted ID can be reused, and a create with a
/// previously seen idempotency key returns the first response.
///
/// # Example
///
/// ```ignore
/// let mock = MockCouponProvider::new();
/// mock.add_coupon(coupon);
/// mock.set_method_error("list_coupons", PaymentError::network("reset"));
/// ```
#[derive(Default)]
pub struct MockCouponProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Coupons by ID, ordered for deterministic listing.
    coupons: BTreeMap<String, Coupon>,

    /// Counter for generated coupon IDs.
    next_generated_id: u64,

    /// Errors to return on the next calls, in order.
    queued_errors: Vec<PaymentError>,

    /// Responses of successful creates, replayed for a repeated idempotency key.
    idempotent_creates: HashMap<String, Coupon>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockCouponProvider {
    /// Create a new mock provider with no coupons.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a coupon to the "account".
    pub fn add_coupon(&self, coupon: Coupon) {
        let id = coupon.id.clone();
        self.lock().coupons.insert(id, coupon);
    }

    /// Return the stored coupon, bypassing call tracking.
    pub fn coupon(&self, id: &str) -> Option<Coupon> {
        self.lock().coupons.get(id).cloned()
    }

    pub fn coupon_count(&self) -> usize {
        self.lock().coupons.len()
    }

    /// Queue an error returned by the next call to any method.
    pub fn push_error(&self, error: PaymentError) {
        self.lock().queued_errors.push(error);
    }

    /// Set an error for every call to a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.lock().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.lock();
        state.queued_errors.clear();
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.lock().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.lock().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.lock()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.lock().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.lock().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.lock();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Queued errors are consumed in order
        if !state.queued_errors.is_empty() {
            return Err(state.queued_errors.remove(0));
        }

        Ok(())
    }
}

impl Clone for MockCouponProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl CouponProvider for MockCouponProvider {
    async fn list_coupons(&self) -> Result<Vec<Coupon>, PaymentError> {
        self.record_call("list_coupons", Vec::new());
        self.check_error("list_coupons")?;

        Ok(self.lock().coupons.values().cloned().collect())
    }

    async fn retrieve_coupon(&self, coupon_id: &str) -> Result<Coupon, PaymentError> {
        self.record_call("retrieve_coupon", vec![coupon_id.to_string()]);
        self.check_error("retrieve_coupon")?;

        self.lock()
            .coupons
            .get(coupon_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(&format!("Coupon {}", coupon_id)))
    }

    async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon, PaymentError> {
        self.record_call(
            "create_coupon",
            vec![
                request.id.clone().unwrap_or_default(),
                request.percent_off.to_string(),
            ],
        );
        self.check_error("create_coupon")?;

        let mut state = self.lock();

        if let Some(replayed) = request
            .idempotency_key
            .as_ref()
            .and_then(|key| state.idempotent_creates.get(key))
        {
            return Ok(replayed.clone());
        }

        let id = match request.id {
            Some(id) => id,
            None => {
                state.next_generated_id += 1;
                format!("co_mock_{}", state.next_generated_id)
            }
        };

        if state.coupons.contains_key(&id) {
            return Err(PaymentError::invalid_request("Coupon already exists.")
                .with_provider_code("resource_already_exists"));
        }

        let coupon = Coupon {
            id: id.clone(),
            name: request.name,
            percent_off: Some(request.percent_off),
            amount_off: None,
            currency: None,
            duration: request.duration,
            metadata: request.metadata,
            valid: true,
            created: chrono::Utc::now().timestamp(),
        };

        state.coupons.insert(id, coupon.clone());
        if let Some(key) = request.idempotency_key {
            state.idempotent_creates.insert(key, coupon.clone());
        }
        Ok(coupon)
    }

    async fn delete_coupon(&self, coupon_id: &str) -> Result<DeletedCoupon, PaymentError> {
        self.record_call("delete_coupon", vec![coupon_id.to_string()]);
        self.check_error("delete_coupon")?;

        self.lock()
            .coupons
            .remove(coupon_id)
            .map(|coupon| DeletedCoupon {
                id: coupon.id,
                deleted: true,
            })
            .ok_or_else(|| PaymentError::not_found(&format!("Coupon {}", coupon_id)))
    }
}
