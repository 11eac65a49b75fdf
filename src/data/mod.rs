//! Data module - sheet fetching, validation and typed rosters

mod cache;
mod category;
mod loader;
mod roster;
mod source;

pub use cache::{Clock, SystemClock, TtlCache};
pub use category::{Category, UnknownCategory};
pub use loader::{parse_roster_csv, LoadError, LoadOutcome, RosterLoader, COUNT_COLUMN, LABEL_COLUMN};
pub use roster::{RosterRow, RosterTable};
pub use source::{FetchError, HttpTransport, SourceDescriptor, Transport, DEFAULT_BASE_URL};
