//! # Curation Module
//!
//! The playlist curation pipeline. For one account a run goes through:
//!
//! ```text
//! Artist enumeration  →  Playlist resolution  →  Retention pruning
//!        →  Playlist snapshot  →  Release synchronization  →  Cache write-back
//! ```
//!
//! Each phase is a free function over [`crate::spotify::SpotifyApi`] and a
//! [`crate::report::Reporter`], so it can be driven against an in-memory
//! fake. [`Curator`] strings them together and owns the account cache.
//!
//! Everything runs sequentially with one request in flight at a time; the
//! set of URIs already in the playlist is owned by the synchronization phase.

mod account;
pub mod artists;
mod paging;
pub mod playlist;
pub mod prune;
pub mod releases;

pub use account::{CurationOptions, Curator, RunSummary};
pub use playlist::ResolvedPlaylist;
pub use releases::SyncOutcome;
