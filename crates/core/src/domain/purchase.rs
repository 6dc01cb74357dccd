use cellar_common::{AppError, AppResult};
use cellar_db::entities::{AwardName, Country, PlaceType};
use chrono::{DateTime, FixedOffset};

use super::{check_score, check_text, check_year};

const MAX_PLACE_NAME_LEN: usize = 256;
const MAX_ADDRESS_LEN: usize = 512;
const MAX_CITY_LEN: usize = 128;

/// Where a bottle was bought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSpec {
    pub place_type: PlaceType,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Country,
}

impl PlaceSpec {
    /// Restaurants need an address and a city; supermarkets carry no address.
    pub fn new(
        place_type: PlaceType,
        name: &str,
        address: Option<String>,
        city: Option<String>,
        country: Country,
    ) -> AppResult<Self> {
        let name = check_text("place.name", Some(name.to_string()), MAX_PLACE_NAME_LEN)?
            .ok_or_else(|| AppError::validation("place.name", "must not be blank"))?;
        let address = check_text("place.address", address, MAX_ADDRESS_LEN)?;
        let city = check_text("place.city", city, MAX_CITY_LEN)?;

        match place_type {
            PlaceType::Restaurant => {
                if address.is_none() {
                    return Err(AppError::validation(
                        "place.address",
                        "is required for restaurants",
                    ));
                }
                if city.is_none() {
                    return Err(AppError::validation("place.city", "is required for restaurants"));
                }
            }
            PlaceType::Supermarket => {
                if address.is_some() {
                    return Err(AppError::validation(
                        "place.address",
                        "must be empty for supermarkets",
                    ));
                }
            }
        }

        Ok(Self {
            place_type,
            name,
            address,
            city,
            country,
        })
    }
}

/// A purchase of a wine.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub place: PlaceSpec,
    pub price_paid: f64,
    pub purchased_at: DateTime<FixedOffset>,
}

impl Purchase {
    pub fn new(
        place: PlaceSpec,
        price_paid: f64,
        purchased_at: DateTime<FixedOffset>,
    ) -> AppResult<Self> {
        if !price_paid.is_finite() || price_paid < 0.0 {
            return Err(AppError::validation(
                "purchases.price_paid",
                "must be a non-negative number",
            ));
        }
        Ok(Self {
            place,
            price_paid,
            purchased_at,
        })
    }
}

/// A guide or competition score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub name: AwardName,
    pub score: Option<i32>,
    pub year: Option<i32>,
}

impl Award {
    pub fn new(name: AwardName, score: Option<i32>, year: Option<i32>) -> AppResult<Self> {
        Ok(Self {
            name,
            score: check_score("awards.score", score)?,
            year: check_year("awards.year", year)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field_of(err: AppError) -> String {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_restaurant_requires_address_and_city() {
        let ok = PlaceSpec::new(
            PlaceType::Restaurant,
            "Casa Paco",
            Some("Calle A".to_string()),
            Some("Madrid".to_string()),
            Country::Spain,
        );
        assert!(ok.is_ok());

        let err = PlaceSpec::new(
            PlaceType::Restaurant,
            "Casa Paco",
            Some("  ".to_string()),
            Some("Madrid".to_string()),
            Country::Spain,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "place.address");

        let err = PlaceSpec::new(
            PlaceType::Restaurant,
            "Casa Paco",
            Some("Calle A".to_string()),
            None,
            Country::Spain,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "place.city");
    }

    #[test]
    fn test_supermarket_forbids_address() {
        let ok = PlaceSpec::new(
            PlaceType::Supermarket,
            "Mercadona",
            None,
            Some("Valencia".to_string()),
            Country::Spain,
        );
        assert!(ok.is_ok());

        let err = PlaceSpec::new(
            PlaceType::Supermarket,
            "Mercadona",
            Some("Av. del Puerto 1".to_string()),
            None,
            Country::Spain,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "place.address");
    }

    #[test]
    fn test_place_text_lengths_match_columns() {
        let ok = PlaceSpec::new(
            PlaceType::Restaurant,
            &"n".repeat(256),
            Some("a".repeat(512)),
            Some("c".repeat(128)),
            Country::Spain,
        );
        assert!(ok.is_ok());

        let err = PlaceSpec::new(
            PlaceType::Supermarket,
            &"n".repeat(257),
            None,
            None,
            Country::Spain,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "place.name");

        let err = PlaceSpec::new(
            PlaceType::Restaurant,
            "Casa Paco",
            Some("a".repeat(513)),
            Some("Madrid".to_string()),
            Country::Spain,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "place.address");

        let err = PlaceSpec::new(
            PlaceType::Supermarket,
            "Lidl",
            None,
            Some("c".repeat(129)),
            Country::Spain,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "place.city");
    }

    #[test]
    fn test_purchase_price_must_be_non_negative() {
        let place =
            PlaceSpec::new(PlaceType::Supermarket, "Lidl", None, None, Country::Spain).unwrap();
        let at = DateTime::parse_from_rfc3339("2026-02-28T10:00:00+00:00").unwrap();

        assert!(Purchase::new(place.clone(), 0.0, at).is_ok());
        let err = Purchase::new(place.clone(), -1.0, at).unwrap_err();
        assert_eq!(field_of(err), "purchases.price_paid");
        assert!(Purchase::new(place, f64::INFINITY, at).is_err());
    }

    #[test]
    fn test_award_ranges() {
        assert!(Award::new(AwardName::Penin, Some(95), Some(2024)).is_ok());
        assert!(Award::new(AwardName::Parker, None, None).is_ok());
        assert_eq!(
            field_of(Award::new(AwardName::Parker, Some(101), None).unwrap_err()),
            "awards.score"
        );
        assert_eq!(
            field_of(Award::new(AwardName::Parker, None, Some(1500)).unwrap_err()),
            "awards.year"
        );
    }
}
