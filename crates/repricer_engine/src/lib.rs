//! Repricer engine: page fetching, listing extraction, table store access
//! and the background parsing job.
mod batch;
mod decode;
mod extract;
mod fetch;
mod job;
mod manager;
mod sheets;
mod store;
mod types;

pub use batch::{BatchAccumulator, FlushOutcome};
pub use decode::{decode_page, DecodeError};
pub use extract::{ExtractError, Extractor, ListingExtractor, PageSchema};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use job::{ChannelProgressSink, JobContext, ParsingJob, ProgressSink};
pub use manager::JobManager;
pub use sheets::{SheetsSettings, SheetsStore};
pub use store::{StoreError, TableStore};
pub use types::{
    ExtractionError, FailureKind, FetchError, FetchMetadata, FetchOutput, JobEvent, RunReport,
};
