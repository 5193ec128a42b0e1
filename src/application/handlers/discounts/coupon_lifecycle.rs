//! CouponLifecycle - Keeps discount records and their Stripe coupons in step.
//!
//! Every discount record maps to one Stripe coupon whose ID is derived from
//! the deployment environment and the record ID (`debug_12`, `prod_12`).
//! Operations here create, look up, delete and replace that coupon, and
//! persist the link on the record.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::foundation::DiscountCouponId;
use crate::domain::pricing::{
    Coupon, CouponDuration, CouponEnvironment, CouponLookup, CreateCouponRequest, DiscountCoupon,
    MetadataKey,
};
use crate::ports::{CouponProvider, DeletedCoupon, DiscountCouponRepository};

use super::DiscountError;

/// Outcome of syncing every discount record with Stripe.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Coupons that existed or were created, one per synced record.
    pub synced: Vec<Coupon>,

    /// Records that could not be synced.
    pub failed: Vec<(DiscountCouponId, DiscountError)>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Manages the Stripe coupon behind each discount record.
pub struct CouponLifecycle {
    provider: Arc<dyn CouponProvider>,
    repository: Arc<dyn DiscountCouponRepository>,
    environment: CouponEnvironment,
}

impl CouponLifecycle {
    pub fn new(
        provider: Arc<dyn CouponProvider>,
        repository: Arc<dyn DiscountCouponRepository>,
        environment: CouponEnvironment,
    ) -> Self {
        Self {
            provider,
            repository,
            environment,
        }
    }

    /// Derived Stripe coupon ID for the record.
    pub fn get_stripe_coupon_id(&self, record: &DiscountCoupon) -> String {
        self.environment.coupon_id_for(record)
    }

    /// Looks up the record's coupon by its derived ID.
    pub async fn get_stripe_coupon(
        &self,
        record: &DiscountCoupon,
    ) -> Result<CouponLookup, DiscountError> {
        let coupon_id = self.get_stripe_coupon_id(record);
        match self.provider.retrieve_coupon(&coupon_id).await {
            Ok(coupon) => Ok(CouponLookup::Found(coupon)),
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    discount_coupon_id = %record.id,
                    coupon_id = %coupon_id,
                    "Stripe coupon not found"
                );
                Ok(CouponLookup::NotFound { coupon_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates the record's coupon and links the record to it.
    pub async fn create_stripe_coupon(
        &self,
        record: &mut DiscountCoupon,
    ) -> Result<Coupon, DiscountError> {
        let request = self.create_request(record);
        let coupon = self.provider.create_coupon(request).await?;

        record.link(coupon.id.clone());
        self.repository.update(record).await?;

        tracing::info!(
            discount_coupon_id = %record.id,
            coupon_id = %coupon.id,
            percent_off = record.discount_percentage.value(),
            "Created Stripe coupon"
        );
        Ok(coupon)
    }

    /// Deletes the record's coupon and clears the link.
    ///
    /// Uses the stored coupon ID, falling back to the derived one for
    /// records that were never linked. A coupon Stripe no longer has still
    /// clears the link.
    pub async fn delete_stripe_coupon(
        &self,
        record: &mut DiscountCoupon,
    ) -> Result<DeletedCoupon, DiscountError> {
        let coupon_id = record
            .stripe_coupon_id
            .clone()
            .unwrap_or_else(|| self.get_stripe_coupon_id(record));

        let deleted = match self.provider.delete_coupon(&coupon_id).await {
            Ok(deleted) => deleted,
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    discount_coupon_id = %record.id,
                    coupon_id = %coupon_id,
                    "Coupon already deleted in Stripe, clearing link"
                );
                DeletedCoupon {
                    id: coupon_id,
                    deleted: true,
                }
            }
            Err(e) => return Err(e.into()),
        };

        record.unlink();
        self.repository.update(record).await?;

        tracing::info!(
            discount_coupon_id = %record.id,
            coupon_id = %deleted.id,
            "Deleted Stripe coupon"
        );
        Ok(deleted)
    }

    /// Returns the record's coupon, creating it when Stripe has none.
    ///
    /// A found coupon is linked to the record if the link was missing.
    pub async fn find_or_create_stripe_coupon(
        &self,
        record: &mut DiscountCoupon,
    ) -> Result<Coupon, DiscountError> {
        match self.get_stripe_coupon(record).await? {
            CouponLookup::Found(coupon) => {
                if record.stripe_coupon_id.as_deref() != Some(coupon.id.as_str()) {
                    record.link(coupon.id.clone());
                    self.repository.update(record).await?;
                }
                Ok(coupon)
            }
            CouponLookup::NotFound { .. } => self.create_stripe_coupon(record).await,
        }
    }

    /// Deactivates a coupon so it can no longer be redeemed.
    ///
    /// Stripe has no reversible deactivation for coupons; deletion stops
    /// new redemptions while existing subscriptions keep their discount.
    pub async fn deactivate_stripe_coupon(
        &self,
        coupon: &Coupon,
    ) -> Result<DeletedCoupon, DiscountError> {
        let deleted = self.provider.delete_coupon(&coupon.id).await?;
        tracing::info!(coupon_id = %coupon.id, "Deactivated Stripe coupon");
        Ok(deleted)
    }

    /// Replaces the record's coupon with one matching its current percentage.
    ///
    /// The coupon must carry the record's derived ID. The replacement reuses
    /// that ID, so the old coupon is deactivated first.
    pub async fn replace_stripe_coupon(
        &self,
        record: &mut DiscountCoupon,
        coupon: &Coupon,
    ) -> Result<Coupon, DiscountError> {
        let expected_id = self.get_stripe_coupon_id(record);
        if coupon.id != expected_id {
            tracing::error!(
                discount_coupon_id = %record.id,
                coupon_id = %coupon.id,
                expected_id = %expected_id,
                "Refusing to replace a coupon that belongs to another discount"
            );
            return Err(DiscountError::CouponIdMismatch {
                coupon_id: coupon.id.clone(),
                discount_coupon_id: record.id,
                expected_id,
            });
        }

        match self.deactivate_stripe_coupon(coupon).await {
            Ok(_) => {}
            Err(DiscountError::Payment(e)) if e.is_not_found() => {
                tracing::warn!(
                    coupon_id = %coupon.id,
                    "Coupon already gone before replacement"
                );
            }
            Err(e) => return Err(e),
        }

        // The old ID is gone remotely; persist that before creating again.
        record.unlink();
        self.repository.update(record).await?;

        let replacement = self.create_stripe_coupon(record).await?;

        tracing::info!(
            discount_coupon_id = %record.id,
            coupon_id = %replacement.id,
            "Replaced Stripe coupon"
        );
        Ok(replacement)
    }

    /// Ensures every discount record has its Stripe coupon.
    ///
    /// Failures are collected per record; one bad record does not stop the
    /// rest. Repository failures while listing abort the sync.
    pub async fn sync_all(&self) -> Result<SyncReport, DiscountError> {
        let records = self.repository.list_all().await?;
        let mut report = SyncReport::default();

        for mut record in records {
            match self.find_or_create_stripe_coupon(&mut record).await {
                Ok(coupon) => report.synced.push(coupon),
                Err(e) => {
                    tracing::error!(
                        discount_coupon_id = %record.id,
                        error = %e,
                        "Failed to sync discount coupon"
                    );
                    report.failed.push((record.id, e));
                }
            }
        }

        tracing::info!(
            synced = report.synced.len(),
            failed = report.failed.len(),
            environment = %self.environment,
            "Discount coupon sync finished"
        );
        Ok(report)
    }

    fn create_request(&self, record: &DiscountCoupon) -> CreateCouponRequest {
        let mut metadata = HashMap::new();
        metadata.insert(
            MetadataKey::DiscountCouponId.as_str().to_string(),
            record.id.to_string(),
        );

        let name = Some(record.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        CreateCouponRequest {
            id: Some(self.get_stripe_coupon_id(record)),
            name,
            percent_off: Decimal::from(record.discount_percentage.value()),
            duration: CouponDuration::Forever,
            metadata,
            idempotency_key: Some(self.idempotency_key(record)),
        }
    }

    /// One key per logical create. Retries reuse the request and so the key;
    /// a later create under the same coupon ID gets a fresh one.
    fn idempotency_key(&self, record: &DiscountCoupon) -> String {
        let now = Utc::now();
        format!(
            "{}-{}-{}",
            self.get_stripe_coupon_id(record),
            record.discount_percentage.value(),
            now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros()),
        )
    }
}
