//! Bulk archiver for public chess game history.
//!
//! For every player in a population (one named player, or everyone holding a
//! set of titles) and every year in a range, the archiver fetches the
//! player's monthly game listings, normalizes each game's PGN and writes one
//! JSON archive per player/year. Years with nothing worth keeping go on a
//! skip list instead, so a re-run only fetches what is still missing.
//!
//! - [`fetch`]: remote lookups with back-off; failures degrade to "no data"
//! - [`archive`]: one player/year, from months to archive file or skip list
//! - [`persistence`]: archive files and the skip list on disk
//! - [`fleet`]: population resolution and the worker pool
//! - [`config`]: tunables and their defaults

pub mod archive;
pub mod config;
pub mod fetch;
pub mod fleet;
pub mod persistence;
pub mod progress;

pub use archive::{ArchiveError, MissingPgnPolicy, YearArchiver, YearOutcome};
pub use config::{ArchiverConfig, ConfigError, Population};
pub use fleet::{Fleet, FleetSummary};
