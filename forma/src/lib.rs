//! Conversion routing engine: searches for a chain of independently
//! developed format handlers that together transform an input MIME into a
//! requested output MIME, executes that chain step by step, and caches
//! both the attempt work within one search and the discovered chain
//! across sessions.

pub mod config;
pub mod executor;
pub mod format;
pub mod handler;
pub mod node;
pub mod progress;
pub mod registry;
pub mod router;
pub mod search;
pub mod store;

pub use config::RouterConfig;
pub use executor::AttemptExecutor;
pub use format::Format;
pub use handler::{FileData, Handler};
pub use node::{Chain, Node, MAX_CHAIN_LEN};
pub use progress::{LoggingProgress, NoopProgress, ProgressEvent, ProgressObserver};
pub use registry::{FormatCache, FormatRegistry, FormatRegistryBuilder};
pub use router::{ConversionOutcome, Router};
pub use search::{PathSearcher, RoutingMode, SearchOutcome};
pub use store::{PathStore, StoredNode};
