//! Shared test harness modules for the SiteScout CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod api;
mod helpers;
mod query;
