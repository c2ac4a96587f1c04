// Library root: data ingestion and record correlation for the prediction
// viewer. Parses the CSV sources, builds the indices, and composes per-game
// views for presentation.

pub mod averages;
pub mod dataset;
pub mod format;
pub mod game_log;
pub mod history;
pub mod predictions;
pub mod quality;
pub mod source;
pub mod stat;
pub mod table;
pub mod view;

pub use dataset::{Dataset, LoadReport, SourceKind, SourceNames, SourceStatus, SourceTexts};
pub use source::{
    FileFetcher, HttpFetcher, MemoryFetcher, SourceError, SourceFetcher, DEFAULT_HTTP_TIMEOUT,
};
pub use stat::{Stat, StatBag};
pub use table::parse_date;
pub use view::{PlayerView, ViewOutcome, Windows};
