//! # Forex Predict
//!
//! `forex_predict` is the workspace root for the exchange-rate forecasting
//! tools. It re-exports the [`forex_forecast`] crate.
//!
//! ## Example
//!
//! ```
//! use forex_predict::{ArimaOrder, ForecastConfig};
//!
//! let config = ForecastConfig::default();
//! assert_eq!(config.order, ArimaOrder::new(5, 1, 0));
//! assert_eq!(config.horizon, 7);
//! ```

pub use forex_forecast::*;
