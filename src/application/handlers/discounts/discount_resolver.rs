//! DiscountResolver - Resolves the discount a price level is entitled to.
//!
//! Discounted price levels are backed by exactly one Stripe coupon tagged
//! with `metadata.price_level`. Resolved discounts are cached per level for
//! the lifetime of the resolver; share one resolver (behind an `Arc`) to
//! share the cache across the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::OnceCell;

use crate::domain::pricing::{Coupon, Discount, Member, PriceLevel, Product};
use crate::ports::CouponProvider;

use super::DiscountError;

/// Resolves price levels to discounts backed by Stripe coupons.
pub struct DiscountResolver {
    provider: Arc<dyn CouponProvider>,
    cache: Mutex<HashMap<PriceLevel, Arc<OnceCell<Discount>>>>,
}

impl DiscountResolver {
    pub fn new(provider: Arc<dyn CouponProvider>) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the member's price level.
    pub fn get_price_level_for_member(member: &Member) -> Result<PriceLevel, DiscountError> {
        Ok(member.price_level()?)
    }

    /// Returns the discount for buying `product` at `price_level`.
    ///
    /// Products that do not list the level in `allowed_price_levels` are
    /// sold at full price, without contacting Stripe.
    pub async fn get_discount_for_product(
        &self,
        product: &Product,
        price_level: PriceLevel,
    ) -> Result<Discount, DiscountError> {
        let allowed = product.allowed_price_levels()?;
        if !allowed.contains(&price_level) {
            tracing::debug!(
                product_id = %product.id,
                price_level = %price_level,
                "Price level not allowed a discount on product"
            );
            return Ok(Discount::none());
        }

        self.get_discount_fraction_off(price_level).await
    }

    /// Convenience for `get_discount_for_product` with the member's own level.
    pub async fn get_discount_for_member(
        &self,
        member: &Member,
        product: &Product,
    ) -> Result<Discount, DiscountError> {
        let price_level = Self::get_price_level_for_member(member)?;
        self.get_discount_for_product(product, price_level).await
    }

    /// Returns the discount for a price level.
    ///
    /// The first successful resolution per level is cached; failures are
    /// not, so the next call queries Stripe again.
    pub async fn get_discount_fraction_off(
        &self,
        price_level: PriceLevel,
    ) -> Result<Discount, DiscountError> {
        let cell = self.cell_for(price_level);
        let discount = cell
            .get_or_try_init(|| self.resolve_discount(price_level))
            .await?;
        Ok(discount.clone())
    }

    /// Drops every cached discount.
    pub fn invalidate(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        tracing::info!("Discount cache invalidated");
    }

    fn cell_for(&self, price_level: PriceLevel) -> Arc<OnceCell<Discount>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(price_level)
            .or_default()
            .clone()
    }

    async fn resolve_discount(&self, price_level: PriceLevel) -> Result<Discount, DiscountError> {
        if !price_level.is_discounted() {
            return Ok(Discount::none());
        }

        let mut matching: Vec<Coupon> = self
            .provider
            .list_coupons()
            .await?
            .into_iter()
            .filter(|coupon| coupon.is_tagged_with(price_level))
            .collect();

        let coupon = match matching.len() {
            0 => return Err(DiscountError::NoCouponForPriceLevel(price_level)),
            1 => matching.remove(0),
            count => {
                return Err(DiscountError::MultipleCouponsForPriceLevel {
                    level: price_level,
                    count,
                })
            }
        };

        let discount = discount_from_coupon(coupon)?;
        tracing::info!(
            price_level = %price_level,
            coupon_id = discount.coupon_id().unwrap_or_default(),
            fraction_off = %discount.fraction_off,
            "Resolved discount for price level"
        );
        Ok(discount)
    }
}

fn discount_from_coupon(coupon: Coupon) -> Result<Discount, DiscountError> {
    if coupon.has_fixed_amount_off() {
        return Err(DiscountError::FixedAmountOff {
            coupon_id: coupon.id,
        });
    }

    let percent_off = match coupon.percent_off {
        Some(p) if p >= Decimal::ZERO && p <= Decimal::ONE_HUNDRED => p,
        other => {
            return Err(DiscountError::InvalidPercentOff {
                coupon_id: coupon.id,
                percent_off: other,
            })
        }
    };

    Ok(Discount {
        fraction_off: percent_off / Decimal::ONE_HUNDRED,
        coupon: Some(coupon),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockCouponProvider;
    use crate::domain::foundation::{MemberId, ProductId};
    use crate::domain::pricing::fixtures::tagged_coupon;
    use crate::ports::PaymentError;
    use proptest::prelude::*;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn resolver_with(coupons: Vec<Coupon>) -> (DiscountResolver, MockCouponProvider) {
        let mock = MockCouponProvider::new();
        for coupon in coupons {
            mock.add_coupon(coupon);
        }
        (DiscountResolver::new(Arc::new(mock.clone())), mock)
    }

    fn low_income_coupon(percent: i64) -> Coupon {
        tagged_coupon("co_low", PriceLevel::LowIncomeDiscount, Decimal::from(percent))
    }

    fn discounted_product() -> Product {
        Product::new(ProductId::new(7), "Annual membership")
            .with_allowed_price_levels(&[PriceLevel::LowIncomeDiscount])
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Price Level Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn member_price_level_is_read_from_record() {
        let member = Member::new(MemberId::new(1), PriceLevel::LowIncomeDiscount);
        assert_eq!(
            DiscountResolver::get_price_level_for_member(&member).unwrap(),
            PriceLevel::LowIncomeDiscount
        );
    }

    #[test]
    fn unknown_member_price_level_is_an_error() {
        let member = Member {
            id: MemberId::new(1),
            price_level: "platinum".to_string(),
        };
        assert!(matches!(
            DiscountResolver::get_price_level_for_member(&member),
            Err(DiscountError::Validation(_))
        ));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Fraction Off Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn normal_level_needs_no_remote_call() {
        let (resolver, mock) = resolver_with(vec![]);

        let discount = resolver.get_discount_fraction_off(PriceLevel::Normal).await.unwrap();

        assert_eq!(discount, Discount::none());
        assert!(!mock.was_called("list_coupons"));
    }

    #[tokio::test]
    async fn tagged_coupon_gives_exact_fraction() {
        let (resolver, _) = resolver_with(vec![low_income_coupon(25)]);

        let discount = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(discount.fraction_off, Decimal::new(25, 2));
        assert_eq!(discount.coupon_id(), Some("co_low"));
    }

    #[tokio::test]
    async fn untagged_coupons_are_ignored() {
        let mut untagged = low_income_coupon(50);
        untagged.id = "co_other".to_string();
        untagged.metadata.clear();
        let (resolver, _) = resolver_with(vec![untagged, low_income_coupon(10)]);

        let discount = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(discount.coupon_id(), Some("co_low"));
    }

    #[tokio::test]
    async fn missing_coupon_fails() {
        let (resolver, _) = resolver_with(vec![]);

        let err = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap_err();

        assert_eq!(err, DiscountError::NoCouponForPriceLevel(PriceLevel::LowIncomeDiscount));
    }

    #[tokio::test]
    async fn duplicate_coupons_fail() {
        let mut second = low_income_coupon(30);
        second.id = "co_low_2".to_string();
        let (resolver, _) = resolver_with(vec![low_income_coupon(30), second]);

        let err = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DiscountError::MultipleCouponsForPriceLevel {
                level: PriceLevel::LowIncomeDiscount,
                count: 2
            }
        );
    }

    #[tokio::test]
    async fn fixed_amount_coupon_is_rejected() {
        let mut coupon = low_income_coupon(0);
        coupon.percent_off = None;
        coupon.amount_off = Some(500);
        coupon.currency = Some("usd".to_string());
        let (resolver, _) = resolver_with(vec![coupon]);

        let err = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscountError::FixedAmountOff { .. }));
    }

    #[tokio::test]
    async fn out_of_range_percent_is_rejected() {
        let (resolver, _) = resolver_with(vec![low_income_coupon(150)]);

        let err = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscountError::InvalidPercentOff { .. }));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Cache Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn resolved_discount_is_cached() {
        let (resolver, mock) = resolver_with(vec![low_income_coupon(25)]);

        let first = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();
        let second = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.call_count("list_coupons"), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (resolver, mock) = resolver_with(vec![]);

        assert!(resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .is_err());

        mock.add_coupon(low_income_coupon(40));
        let discount = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(discount.fraction_off, Decimal::new(4, 1));
        assert_eq!(mock.call_count("list_coupons"), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_lookup() {
        let (resolver, mock) = resolver_with(vec![low_income_coupon(25)]);
        resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        mock.add_coupon(low_income_coupon(35));
        resolver.invalidate();
        let discount = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(discount.fraction_off, Decimal::new(35, 2));
        assert_eq!(mock.call_count("list_coupons"), 2);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let (resolver, mock) = resolver_with(vec![low_income_coupon(25)]);
        mock.push_error(PaymentError::authentication("bad key"));

        let err = resolver
            .get_discount_fraction_off(PriceLevel::LowIncomeDiscount)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscountError::Payment(_)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Product Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn allowed_level_gets_discount_on_product() {
        let (resolver, _) = resolver_with(vec![low_income_coupon(20)]);

        let discount = resolver
            .get_discount_for_product(&discounted_product(), PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(discount.fraction_off, Decimal::new(2, 1));
    }

    #[tokio::test]
    async fn disallowed_level_pays_full_price() {
        let (resolver, mock) = resolver_with(vec![low_income_coupon(20)]);
        let product = Product::new(ProductId::new(8), "Donation");

        let discount = resolver
            .get_discount_for_product(&product, PriceLevel::LowIncomeDiscount)
            .await
            .unwrap();

        assert_eq!(discount, Discount::none());
        assert!(!mock.was_called("list_coupons"));
    }

    #[tokio::test]
    async fn member_discount_uses_member_level() {
        let (resolver, _) = resolver_with(vec![low_income_coupon(20)]);
        let member = Member::new(MemberId::new(3), PriceLevel::LowIncomeDiscount);

        let discount = resolver
            .get_discount_for_member(&member, &discounted_product())
            .await
            .unwrap();

        assert_eq!(discount.coupon_id(), Some("co_low"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Property Tests
    // ════════════════════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn fraction_is_percent_over_one_hundred(percent in 0u32..=100) {
            let coupon = tagged_coupon("co", PriceLevel::LowIncomeDiscount, Decimal::from(percent));
            let discount = discount_from_coupon(coupon).unwrap();
            prop_assert_eq!(discount.fraction_off * Decimal::ONE_HUNDRED, Decimal::from(percent));
            prop_assert!(discount.fraction_off >= Decimal::ZERO);
            prop_assert!(discount.fraction_off <= Decimal::ONE);
        }
    }
}
