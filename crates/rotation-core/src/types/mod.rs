//! Core data types for the rotation engine.

mod instrument;
mod order;
mod portfolio;
mod resolution;
mod window;

pub use instrument::Instrument;
pub use order::{OrderIntent, Side};
pub use portfolio::{Holding, PortfolioSnapshot};
pub use resolution::Resolution;
pub use window::{PriceBar, PriceField, PriceWindow};
