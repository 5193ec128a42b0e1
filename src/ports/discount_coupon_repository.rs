//! Discount coupon repository port.
//!
//! Persists the internal discount records and their link to Stripe.
//! Transaction boundaries belong to the caller; `update` writes through
//! whatever connection or transaction the implementation was built with.

use crate::domain::foundation::{DiscountCouponId, DomainError};
use crate::domain::pricing::DiscountCoupon;
use async_trait::async_trait;

/// Repository port for discount coupon records.
#[async_trait]
pub trait DiscountCouponRepository: Send + Sync {
    /// Find a record by ID.
    async fn find_by_id(&self, id: DiscountCouponId) -> Result<Option<DiscountCoupon>, DomainError>;

    /// List every record, ordered by ID.
    async fn list_all(&self) -> Result<Vec<DiscountCoupon>, DomainError>;

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a record with the same ID exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, record: &DiscountCoupon) -> Result<(), DomainError>;

    /// Write back an existing record.
    ///
    /// # Errors
    ///
    /// - `DiscountCouponNotFound` if the record does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, record: &DiscountCoupon) -> Result<(), DomainError>;
}
