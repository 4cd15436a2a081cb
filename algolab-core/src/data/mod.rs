//! Market data providers.

pub mod csv;
pub mod provider;
pub mod yahoo;

pub use csv::CsvProvider;
pub use provider::{DataError, DataProvider, FetchProgress, StdoutProgress};
pub use yahoo::YahooProvider;
