//! DailyMed v2 REST surface: client, query builders and response models

pub mod client;
pub mod models;
pub mod query;
pub(crate) mod responses;

pub use client::DailyMedClient;
pub use models::{
    DrugClass, DrugName, NdcEntry, PackageDescription, PackagedIngredient, PackagedProduct, Page,
    Pagination, RxConcept, SplHistory, SplNdcs, SplPackaging, SplReference, SplSearchPage,
    SplSummary, SplVersion, Unii,
};
pub use query::{
    DateComparison, DrugClassQuery, DrugNameQuery, NameType, NdcQuery, RxcuiQuery, SplQuery,
    UniiQuery,
};
