//! Wine service: aggregate creation, partial update, deletion and listing.

use cellar_common::{AppError, AppResult, PhotoStorageService};
use cellar_db::entities::{
    AwardName, Country, PlaceType, WineType, place, wine, wine_award, wine_grape, wine_purchase,
};
use cellar_db::repositories::{NewPurchase, PhotoRepository, WineAggregate, WineRepository};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{NotSet, Set, Value};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{
    Award, GrapeLink, MAX_AGING_TYPE_LEN, MAX_WINERY_LEN, PlaceSpec, Purchase, WineFields,
    check_distinct_grapes, check_name, check_percentage, check_text, check_year,
};

use super::origin::{
    DenominationConsistencyRule, DenominationLookupService, GrapeLookupService,
    ensure_grapes_exist,
};
use super::wine_query::{ListWinesQuery, WinePage};

/// Deserialize a present field as `Some`, so that an explicit `null` becomes
/// `Some(None)` while an absent field stays `None`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A grape of a wine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrapeInput {
    pub grape_id: i32,
    #[serde(alias = "pct")]
    pub percentage: Option<f64>,
}

/// Where a bottle was bought.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceInput {
    #[serde(rename = "type", alias = "place_type")]
    pub place_type: PlaceType,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Country,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PurchaseInput {
    pub place: PlaceInput,
    #[serde(alias = "price")]
    pub price_paid: f64,
    pub purchased_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AwardInput {
    pub name: AwardName,
    pub score: Option<i32>,
    pub year: Option<i32>,
}

/// Input for creating a wine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWineInput {
    pub name: String,
    #[validate(length(max = 200))]
    pub winery: Option<String>,
    pub wine_type: Option<WineType>,
    #[serde(alias = "origin_id")]
    pub do_id: Option<i32>,
    pub country: Option<Country>,
    #[validate(length(max = 64))]
    pub aging_type: Option<String>,
    pub vintage_year: Option<i32>,
    pub alcohol_percentage: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub grapes: Vec<GrapeInput>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub purchases: Vec<PurchaseInput>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub awards: Vec<AwardInput>,
}

/// Input for a partial wine update.
///
/// `None` leaves a column alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWineInput {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 200))]
    pub winery: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub wine_type: Option<Option<WineType>>,
    #[serde(default, deserialize_with = "deserialize_some", alias = "origin_id")]
    pub do_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub country: Option<Option<Country>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 64))]
    pub aging_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub vintage_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub alcohol_percentage: Option<Option<f64>>,
    /// Replaces the whole grape set when present.
    #[validate(length(max = 20))]
    pub grapes: Option<Vec<GrapeInput>>,
}

impl UpdateWineInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.winery.is_none()
            && self.wine_type.is_none()
            && self.do_id.is_none()
            && self.country.is_none()
            && self.aging_type.is_none()
            && self.vintage_year.is_none()
            && self.alcohol_percentage.is_none()
            && self.grapes.is_none()
    }
}

fn enum_value<E: Into<Value>>(value: Option<E>) -> Value {
    value.map_or(Value::String(None), Into::into)
}

fn grape_links(inputs: &[GrapeInput]) -> AppResult<Vec<GrapeLink>> {
    let links = inputs
        .iter()
        .map(|g| GrapeLink::new(g.grape_id, g.percentage))
        .collect::<AppResult<Vec<_>>>()?;
    check_distinct_grapes(&links)?;
    Ok(links)
}

fn grape_models(links: &[GrapeLink]) -> Vec<wine_grape::ActiveModel> {
    links
        .iter()
        .map(|link| wine_grape::ActiveModel {
            wine_id: NotSet,
            grape_id: Set(link.grape_id),
            percentage: Set(link.percentage),
        })
        .collect()
}

fn grape_ids(links: &[GrapeLink]) -> Vec<i32> {
    links.iter().map(|link| link.grape_id).collect()
}

/// Build the rows inserted for a new wine.
pub(crate) fn build_aggregate(
    fields: WineFields,
    do_id: Option<i32>,
    country: Option<Country>,
    links: &[GrapeLink],
    purchases: Vec<Purchase>,
    awards: Vec<Award>,
) -> WineAggregate {
    let now = Utc::now().fixed_offset();

    WineAggregate {
        wine: wine::ActiveModel {
            id: NotSet,
            name: Set(fields.name),
            winery: Set(fields.winery),
            wine_type: Set(fields.wine_type),
            do_id: Set(do_id),
            country: Set(country),
            aging_type: Set(fields.aging_type),
            vintage_year: Set(fields.vintage_year),
            alcohol_percentage: Set(fields.alcohol_percentage),
            created_at: Set(now),
            updated_at: Set(now),
        },
        grapes: grape_models(links),
        purchases: purchases
            .into_iter()
            .map(|p| NewPurchase {
                place: place::ActiveModel {
                    id: NotSet,
                    place_type: Set(p.place.place_type),
                    name: Set(p.place.name),
                    address: Set(p.place.address),
                    city: Set(p.place.city),
                    country: Set(p.place.country),
                },
                purchase: wine_purchase::ActiveModel {
                    id: NotSet,
                    wine_id: NotSet,
                    place_id: NotSet,
                    price_paid: Set(p.price_paid),
                    purchased_at: Set(p.purchased_at),
                    created_at: Set(now),
                },
            })
            .collect(),
        awards: awards
            .into_iter()
            .map(|a| wine_award::ActiveModel {
                id: NotSet,
                wine_id: NotSet,
                name: Set(a.name),
                score: Set(a.score),
                year: Set(a.year),
            })
            .collect(),
    }
}

/// Service for managing wines.
#[derive(Clone)]
pub struct WineService {
    wine_repo: WineRepository,
    photo_repo: PhotoRepository,
    origin_rule: DenominationConsistencyRule,
    grapes: GrapeLookupService,
    storage: PhotoStorageService,
}

impl WineService {
    /// Create a new wine service.
    #[must_use]
    pub fn new(
        wine_repo: WineRepository,
        photo_repo: PhotoRepository,
        denominations: DenominationLookupService,
        grapes: GrapeLookupService,
        storage: PhotoStorageService,
    ) -> Self {
        Self {
            wine_repo,
            photo_repo,
            origin_rule: DenominationConsistencyRule::new(denominations),
            grapes,
            storage,
        }
    }

    /// Create a wine with its grapes, purchases and awards. Returns the new id.
    pub async fn create(&self, input: CreateWineInput) -> AppResult<i32> {
        input.validate()?;

        let fields = WineFields::new(
            &input.name,
            input.winery,
            input.wine_type,
            input.aging_type,
            input.vintage_year,
            input.alcohol_percentage,
        )?;
        let links = grape_links(&input.grapes)?;
        let purchases = input
            .purchases
            .into_iter()
            .map(|p| {
                let place = PlaceSpec::new(
                    p.place.place_type,
                    &p.place.name,
                    p.place.address,
                    p.place.city,
                    p.place.country,
                )?;
                Purchase::new(place, p.price_paid, p.purchased_at)
            })
            .collect::<AppResult<Vec<_>>>()?;
        let awards = input
            .awards
            .into_iter()
            .map(|a| Award::new(a.name, a.score, a.year))
            .collect::<AppResult<Vec<_>>>()?;

        let country = self.origin_rule.resolve(input.do_id, input.country).await?;
        ensure_grapes_exist(self.grapes.as_ref(), &grape_ids(&links)).await?;

        let aggregate = build_aggregate(fields, input.do_id, country, &links, purchases, awards);
        let wine_id = self.wine_repo.create_aggregate(aggregate).await?;

        info!(wine_id, grapes = links.len(), "Created wine");

        Ok(wine_id)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: i32, input: UpdateWineInput) -> AppResult<()> {
        input.validate()?;

        if input.is_empty() {
            return Err(AppError::validation("request", "at least one field required"));
        }

        // Shape checks first, lookups after.
        let mut assignments: Vec<(wine::Column, Value)> = Vec::new();

        if let Some(name) = &input.name {
            let name = name
                .as_deref()
                .ok_or_else(|| AppError::validation("name", "must not be blank"))?;
            assignments.push((wine::Column::Name, check_name(name)?.into()));
        }
        if let Some(winery) = input.winery {
            let winery = check_text("winery", winery, MAX_WINERY_LEN)?;
            assignments.push((wine::Column::Winery, winery.into()));
        }
        if let Some(wine_type) = input.wine_type {
            assignments.push((wine::Column::WineType, enum_value(wine_type)));
        }
        if let Some(aging_type) = input.aging_type {
            let aging_type = check_text("aging_type", aging_type, MAX_AGING_TYPE_LEN)?;
            assignments.push((wine::Column::AgingType, aging_type.into()));
        }
        if let Some(vintage_year) = input.vintage_year {
            let vintage_year = check_year("vintage_year", vintage_year)?;
            assignments.push((wine::Column::VintageYear, vintage_year.into()));
        }
        if let Some(alcohol) = input.alcohol_percentage {
            let alcohol = check_percentage("alcohol_percentage", alcohol)?;
            assignments.push((wine::Column::AlcoholPercentage, alcohol.into()));
        }
        let links = input.grapes.as_deref().map(grape_links).transpose()?;

        let declared_country = input.country.flatten();
        match input.do_id {
            Some(Some(do_id)) => {
                let country = self.origin_rule.resolve(Some(do_id), declared_country).await?;
                assignments.push((wine::Column::DoId, do_id.into()));
                assignments.push((wine::Column::Country, enum_value(country)));
            }
            Some(None) => {
                assignments.push((wine::Column::DoId, Value::Int(None)));
                if let Some(country) = input.country {
                    assignments.push((wine::Column::Country, enum_value(country)));
                }
            }
            None => {
                if let Some(country) = declared_country {
                    let existing = self
                        .wine_repo
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::NotFound(format!("Wine {id} not found")))?;
                    if let Some(do_id) = existing.do_id {
                        self.origin_rule.check_existing(do_id, country).await?;
                    }
                }
                if let Some(country) = input.country {
                    assignments.push((wine::Column::Country, enum_value(country)));
                }
            }
        }

        if let Some(links) = &links {
            ensure_grapes_exist(self.grapes.as_ref(), &grape_ids(links)).await?;
        }

        let changed = assignments.len();
        let existed = self
            .wine_repo
            .update_partial(id, assignments, links.as_deref().map(grape_models))
            .await?;

        if !existed {
            return Err(AppError::NotFound(format!("Wine {id} not found")));
        }

        info!(wine_id = id, columns = changed, "Updated wine");
        Ok(())
    }

    /// Delete a wine, then its photo files.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let urls = self.photo_repo.find_urls_by_wine(id).await?;

        if !self.wine_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Wine {id} not found")));
        }

        for url in &urls {
            if let Err(e) = self.storage.delete_by_url(url).await {
                warn!(wine_id = id, url = %url, error = %e, "Failed to delete photo file");
            }
        }
        if let Err(e) = self.storage.delete_wine_dir(id).await {
            warn!(wine_id = id, error = %e, "Failed to delete photo directory");
        }

        info!(wine_id = id, photos = urls.len(), "Deleted wine");
        Ok(())
    }

    /// List one page of wines.
    pub async fn list(&self, query: ListWinesQuery) -> AppResult<WinePage> {
        let filter = query.into_filter()?;
        let (items, total) = self.wine_repo.list(&filter).await?;
        Ok(WinePage::new(items, filter.page, filter.limit, total))
    }
}
