//! Valuations module - point-in-time values of named assets and liabilities.

mod valuations_model;
mod valuations_service;
mod valuations_traits;


pub use valuations_model::{NewValuationPoint, ValuationKind, ValuationPoint, ValuationUpdate};
pub use valuations_service::ValuationService;
pub use valuations_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
