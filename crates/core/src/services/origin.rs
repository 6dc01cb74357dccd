//! Denomination of origin consistency.
//!
//! A wine's country must match the country of its denomination whenever both
//! are set.

use std::sync::Arc;

use async_trait::async_trait;
use cellar_common::{AppError, AppResult};
use cellar_db::entities::{Country, denomination};
use cellar_db::repositories::{DenominationRepository, GrapeRepository};

/// Looks up denominations by id.
#[async_trait]
pub trait DenominationLookup: Send + Sync {
    async fn find_denomination(&self, id: i32) -> AppResult<Option<denomination::Model>>;
}

#[async_trait]
impl DenominationLookup for DenominationRepository {
    async fn find_denomination(&self, id: i32) -> AppResult<Option<denomination::Model>> {
        self.find_by_id(id).await
    }
}

/// Shared denomination lookup handle.
pub type DenominationLookupService = Arc<dyn DenominationLookup>;

/// Reports which of a set of grape ids exist.
#[async_trait]
pub trait GrapeLookup: Send + Sync {
    async fn existing_grape_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>>;
}

#[async_trait]
impl GrapeLookup for GrapeRepository {
    async fn existing_grape_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        self.find_existing_ids(ids).await
    }
}

/// Shared grape lookup handle.
pub type GrapeLookupService = Arc<dyn GrapeLookup>;

/// Fail with [`AppError::ReferenceNotFound`] unless every id exists.
pub async fn ensure_grapes_exist(grapes: &dyn GrapeLookup, ids: &[i32]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let existing = grapes.existing_grape_ids(ids).await?;
    let missing: Vec<i32> = ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::reference_not_found("grape", missing))
    }
}

/// Cross-checks a declared country against a denomination.
#[derive(Clone)]
pub struct DenominationConsistencyRule {
    lookup: DenominationLookupService,
}

impl DenominationConsistencyRule {
    /// Create a rule backed by a denomination lookup.
    #[must_use]
    pub fn new(lookup: DenominationLookupService) -> Self {
        Self { lookup }
    }

    async fn load(&self, origin_id: i32) -> AppResult<denomination::Model> {
        self.lookup
            .find_denomination(origin_id)
            .await?
            .ok_or_else(|| AppError::reference_not_found("denomination", vec![origin_id]))
    }

    /// Resolve the country to store for a wine.
    ///
    /// - origin and country: must agree.
    /// - origin only: the origin's country.
    /// - country only: the country as given.
    /// - neither: `None`.
    pub async fn resolve(
        &self,
        origin_id: Option<i32>,
        country: Option<Country>,
    ) -> AppResult<Option<Country>> {
        let Some(origin_id) = origin_id else {
            return Ok(country);
        };

        let origin = self.load(origin_id).await?;
        match country {
            Some(declared) if declared != origin.country => Err(mismatch(origin_id, &origin)),
            _ => Ok(Some(origin.country)),
        }
    }

    /// Check a country against an origin the wine already has.
    pub async fn check_existing(&self, origin_id: i32, country: Country) -> AppResult<()> {
        let origin = self.load(origin_id).await?;
        if origin.country == country {
            Ok(())
        } else {
            Err(mismatch(origin_id, &origin))
        }
    }
}

fn mismatch(origin_id: i32, origin: &denomination::Model) -> AppError {
    AppError::validation(
        "country",
        format!(
            "does not match the country of denomination {origin_id} ({})",
            origin.name
        ),
    )
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fakes::{FakeDenominations, FakeGrapes};
    use super::*;

    fn rule() -> DenominationConsistencyRule {
        DenominationConsistencyRule::new(FakeDenominations::with(&[
            (9, "Bierzo", Country::Spain),
            (12, "Bordeaux", Country::France),
        ]))
    }

    #[tokio::test]
    async fn test_origin_only_derives_country() {
        assert_eq!(rule().resolve(Some(9), None).await.unwrap(), Some(Country::Spain));
    }

    #[tokio::test]
    async fn test_matching_country_accepted() {
        let country = rule().resolve(Some(12), Some(Country::France)).await.unwrap();
        assert_eq!(country, Some(Country::France));
    }

    #[tokio::test]
    async fn test_mismatched_country_rejected() {
        let err = rule()
            .resolve(Some(9), Some(Country::France))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "country"));
    }

    #[tokio::test]
    async fn test_unknown_origin_is_reference_error() {
        let err = rule().resolve(Some(404), None).await.unwrap_err();
        match err {
            AppError::ReferenceNotFound { entity, ids } => {
                assert_eq!(entity, "denomination");
                assert_eq!(ids, vec![404]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_without_origin_country_passes_through() {
        assert_eq!(rule().resolve(None, Some(Country::Chile)).await.unwrap(), Some(Country::Chile));
        assert_eq!(rule().resolve(None, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_check_existing() {
        assert!(rule().check_existing(9, Country::Spain).await.is_ok());
        assert!(rule().check_existing(9, Country::Italy).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_grapes_reported_sorted() {
        let grapes = FakeGrapes(vec![1, 2]);

        assert!(ensure_grapes_exist(&grapes, &[1, 2]).await.is_ok());
        assert!(ensure_grapes_exist(&grapes, &[]).await.is_ok());

        let err = ensure_grapes_exist(&grapes, &[8, 2, 5]).await.unwrap_err();
        match err {
            AppError::ReferenceNotFound { entity, ids } => {
                assert_eq!(entity, "grape");
                assert_eq!(ids, vec![5, 8]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
