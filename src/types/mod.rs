//! Type definitions for the price estimator

pub mod car;
pub mod estimate;

pub use car::{CarInput, InputBounds};
pub use estimate::{format_currency, CategoryField, PriceEstimate, UnrecognizedCategory};
