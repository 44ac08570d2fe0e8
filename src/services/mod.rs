//! Service layer: the catalog engine, the stream pipeline and their
//! collaborator contracts

pub mod catalog;
pub mod filter_state;
pub mod regeneration;
pub mod stream_resolution;
pub mod traits;

pub use catalog::{CatalogEntryBuilder, CatalogPage, CatalogQueryEngine, CatalogSettings};
pub use filter_state::{CatalogCursor, CatalogRequest, FilterState};
pub use regeneration::{ControlCommand, RegenerationCommand, ScriptRegenerator};
pub use stream_resolution::{BranchOutcome, StreamResolutionPipeline};
pub use traits::{
    ChannelCache, EpgView, PlaylistRegenerator, RegenerationReport, StreamProxy, StreamResolver,
};
