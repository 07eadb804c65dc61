pub mod cache;
pub mod csv_source;
pub mod ingestion;
pub mod source;

pub use cache::CachedSource;
pub use csv_source::CsvSource;
pub use ingestion::RestSource;
pub use source::{DataSource, RawNewsRecord, RawPricePoint, SourceError};
