//! PostgreSQL implementation of DiscountCouponRepository.
//!
//! Provides persistent storage for discount coupon records using PostgreSQL.

use crate::domain::foundation::{DiscountCouponId, DomainError, ErrorCode, Percentage};
use crate::domain::pricing::DiscountCoupon;
use crate::ports::DiscountCouponRepository;
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of the DiscountCouponRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresDiscountCouponRepository {
    pool: PgPool,
}

impl PostgresDiscountCouponRepository {
    /// Creates a new PostgresDiscountCouponRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a discount coupon.
#[derive(Debug, sqlx::FromRow)]
struct DiscountCouponRow {
    id: i64,
    description: String,
    discount_percentage: i16,
    stripe_coupon_id: Option<String>,
}

impl TryFrom<DiscountCouponRow> for DiscountCoupon {
    type Error = DomainError;

    fn try_from(row: DiscountCouponRow) -> Result<Self, Self::Error> {
        let discount_percentage =
            Percentage::try_new(i64::from(row.discount_percentage)).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid discount_percentage for discount {}: {}", row.id, e),
                )
            })?;

        Ok(DiscountCoupon {
            id: DiscountCouponId::new(row.id),
            description: row.description,
            discount_percentage,
            stripe_coupon_id: row.stripe_coupon_id,
        })
    }
}

#[async_trait]
impl DiscountCouponRepository for PostgresDiscountCouponRepository {
    async fn find_by_id(&self, id: DiscountCouponId) -> Result<Option<DiscountCoupon>, DomainError> {
        let row: Option<DiscountCouponRow> = sqlx::query_as(
            r#"
            SELECT id, description, discount_percentage, stripe_coupon_id
            FROM discount_coupons
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find discount coupon: {}", e))
        })?;

        row.map(DiscountCoupon::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<DiscountCoupon>, DomainError> {
        let rows: Vec<DiscountCouponRow> = sqlx::query_as(
            r#"
            SELECT id, description, discount_percentage, stripe_coupon_id
            FROM discount_coupons
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list discount coupons: {}", e),
            )
        })?;

        rows.into_iter().map(DiscountCoupon::try_from).collect()
    }

    async fn save(&self, record: &DiscountCoupon) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO discount_coupons (id, description, discount_percentage, stripe_coupon_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id.value())
        .bind(&record.description)
        .bind(i16::from(record.discount_percentage.value()))
        .bind(&record.stripe_coupon_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("discount_coupons_pkey") {
                    return DomainError::validation(
                        "id",
                        format!("Discount coupon {} already exists", record.id),
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save discount coupon: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, record: &DiscountCoupon) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE discount_coupons SET
                description = $2,
                discount_percentage = $3,
                stripe_coupon_id = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(record.id.value())
        .bind(&record.description)
        .bind(i16::from(record.discount_percentage.value()))
        .bind(&record.stripe_coupon_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update discount coupon: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DiscountCouponNotFound,
                format!("Discount coupon {} not found", record.id),
            ));
        }

        Ok(())
    }
}
