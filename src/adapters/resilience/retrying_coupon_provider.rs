//! CouponProvider decorator that retries transient failures.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::pricing::{Coupon, CreateCouponRequest};
use crate::ports::{CouponProvider, DeletedCoupon, PaymentError};

use super::RetryPolicy;

/// Wraps a `CouponProvider` so every call goes through a `RetryPolicy`.
///
/// # Example
///
/// ```ignore
/// let stripe = Arc::new(StripeCouponAdapter::new(config));
/// let provider = RetryingCouponProvider::new(stripe, RetryPolicy::default());
/// ```
pub struct RetryingCouponProvider {
    inner: Arc<dyn CouponProvider>,
    policy: RetryPolicy,
}

impl RetryingCouponProvider {
    pub fn new(inner: Arc<dyn CouponProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl CouponProvider for RetryingCouponProvider {
    async fn list_coupons(&self) -> Result<Vec<Coupon>, PaymentError> {
        self.policy
            .run("list_coupons", || self.inner.list_coupons())
            .await
    }

    async fn retrieve_coupon(&self, coupon_id: &str) -> Result<Coupon, PaymentError> {
        self.policy
            .run("retrieve_coupon", || self.inner.retrieve_coupon(coupon_id))
            .await
    }

    async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon, PaymentError> {
        self.policy
            .run("create_coupon", || self.inner.create_coupon(request.clone()))
            .await
    }

    async fn delete_coupon(&self, coupon_id: &str) -> Result<DeletedCoupon, PaymentError> {
        self.policy
            .run("delete_coupon", || self.inner.delete_coupon(coupon_id))
            .await
    }
}
