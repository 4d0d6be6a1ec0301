//! Distance-aware pharmacy and medicine search.
//!
//! The pipeline resolves the caller's location, retrieves candidates from the
//! catalog store (falling back to a bundled dataset when the store cannot
//! answer), then ranks them by great-circle distance.

pub mod error;
pub mod location;
pub mod retriever;
pub mod service;
pub mod session;
pub mod store;
pub mod synth;
pub mod validate;

pub use error::{GeolocationError, StoreError};
pub use location::{
    GeolocationProvider, HttpGeolocationProvider, LocationResolver, LocationStatus,
    PositionOptions, ReportedPosition, ResolveOptions, ResolvedLocation,
};
pub use retriever::{CandidateRetriever, CandidateSource, Candidates, SearchConfig};
pub use service::{SearchOutcome, SearchRequest, SearchService};
pub use session::{SearchSession, SearchTicket};
pub use store::{CatalogStore, InventoryRecord, PgCatalogStore, PharmacyRecord};
pub use synth::PriceRange;
