//! # CLI Module
//!
//! Command implementations behind the `fanfeed` binary. `main.rs` parses the
//! arguments and hands over to one of these functions together with the
//! resolved [`crate::config::Settings`] and the console reporter.
//!
//! ## Commands
//!
//! - [`run`] - The batch job: curate the managed playlist of every requested
//!   account. This is what a scheduler should invoke.
//! - [`auth`] - Authorize an account ahead of time and store its token so
//!   that scheduled runs never need a browser.
//! - [`info`] - Show the cached accounts with their playlist and the number of
//!   followed artists.
//!
//! ## Usage Patterns
//!
//! ```bash
//! fanfeed auth --user-id alice               # one-time browser login
//! fanfeed run --user-ids alice               # cron: daily curation
//! fanfeed run --track-freshness 14 --old-track-threshold 60
//! fanfeed info
//! ```
//!
//! ## Failure Handling
//!
//! Accounts are processed one after another. A failing account is reported
//! and skipped unless `--fail-fast` is given; the process exit status tells
//! whether every account succeeded.

mod auth;
mod info;
mod run;

pub use auth::auth;
pub use info::info;
pub use run::{DEFAULT_ACCOUNT, RunRequest, run, run_accounts};
