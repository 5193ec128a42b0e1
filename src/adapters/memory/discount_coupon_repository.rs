//! In-memory implementation of DiscountCouponRepository.
//!
//! Used by tests and by local runs without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DiscountCouponId, DomainError, ErrorCode};
use crate::domain::pricing::DiscountCoupon;
use crate::ports::DiscountCouponRepository;

#[derive(Default)]
pub struct InMemoryDiscountCouponRepository {
    records: RwLock<BTreeMap<DiscountCouponId, DiscountCoupon>>,
}

impl InMemoryDiscountCouponRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with records.
    pub fn with_records(records: impl IntoIterator<Item = DiscountCoupon>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }
}

#[async_trait]
impl DiscountCouponRepository for InMemoryDiscountCouponRepository {
    async fn find_by_id(&self, id: DiscountCouponId) -> Result<Option<DiscountCoupon>, DomainError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<DiscountCoupon>, DomainError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn save(&self, record: &DiscountCoupon) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(DomainError::validation(
                "id",
                format!("Discount coupon {} already exists", record.id),
            ));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &DiscountCoupon) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::DiscountCouponNotFound,
                format!("Discount coupon {} not found", record.id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Percentage;

    fn record(id: i64) -> DiscountCoupon {
        DiscountCoupon::new(DiscountCouponId::new(id), "Test", Percentage::try_new(10).unwrap())
    }

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryDiscountCouponRepository::new();
        repo.save(&record(1)).await.unwrap();
        assert_eq!(repo.find_by_id(DiscountCouponId::new(1)).await.unwrap(), Some(record(1)));
        assert_eq!(repo.find_by_id(DiscountCouponId::new(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_rejects_duplicates() {
        let repo = InMemoryDiscountCouponRepository::with_records([record(1)]);
        let err = repo.save(&record(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn update_requires_existing_record() {
        let repo = InMemoryDiscountCouponRepository::new();
        let err = repo.update(&record(5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountCouponNotFound);
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id() {
        let repo = InMemoryDiscountCouponRepository::with_records([record(3), record(1), record(2)]);
        let ids: Vec<i64> = repo
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.value())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
