//! Repositories. All SQL issued by cellar lives here.

mod denomination;
mod grape;
mod photo;
mod review;
mod wine;
mod wine_listing;

pub use denomination::DenominationRepository;
pub use grape::GrapeRepository;
pub use photo::PhotoRepository;
pub use review::ReviewRepository;
pub use wine::{NewPurchase, WineAggregate, WineRepository};
pub use wine_listing::{
    ScoreRange, SortDirection, WineListFilter, WineListRow, WineSortField, build_list_select,
};
