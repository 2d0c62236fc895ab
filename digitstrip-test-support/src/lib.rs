//! Shared test utilities used across digitstrip crates.
//!
//! [`fixtures`] writes small synthetic IDX datasets and compressed payloads
//! so loader, fetcher, and CLI tests never touch the network. [`property`]
//! lets CI tune property-test case counts through the environment.

pub mod fixtures;
pub mod property;
