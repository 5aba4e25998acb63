//! Repricer core: listing data, table matching, batching and job state.
mod batch;
mod bindings;
mod instruction;
mod listing;
mod state;
mod table;

pub use batch::{partition_well_formed, PendingBatch, DEFAULT_BATCH_THRESHOLD};
pub use bindings::{DocumentBindings, DocumentRef, OperatorId};
pub use instruction::{instructions_for, UpdateInstruction};
pub use listing::{
    normalize_price, normalize_quantity, ListingUrl, ScrapedListing, ValidationError,
    PRICE_NOT_FOUND, QUANTITY_BELOW_THRESHOLD,
};
pub use state::{JobLifecycle, JobState, StateError, StopOutcome};
pub use table::{CellAddress, RowIndex, TableSnapshot, PRICE_COLUMN, QUANTITY_COLUMN, URL_COLUMN};
