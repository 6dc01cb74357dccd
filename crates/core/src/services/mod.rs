//! Business logic services.

#![allow(missing_docs)]

pub mod catalog;
pub mod origin;
pub mod photo;
pub mod review;
pub mod wine;
pub mod wine_detail;
pub mod wine_query;

pub use catalog::CatalogService;
pub use origin::{
    DenominationConsistencyRule, DenominationLookup, DenominationLookupService, GrapeLookup,
    GrapeLookupService,
};
pub use photo::PhotoService;
pub use review::{ReviewInput, ReviewService, ReviewWithBullets};
pub use wine::{
    AwardInput, CreateWineInput, GrapeInput, PlaceInput, PurchaseInput, UpdateWineInput,
    WineService,
};
pub use wine_detail::{
    PurchaseDetail, ReviewDetail, WineDetail, WineDetailAssembler, WineGrapeDetail,
};
pub use wine_query::{ListWinesQuery, ScoreBucket, WinePage};
