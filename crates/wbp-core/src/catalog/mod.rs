//! Product catalog lookups.
//!
//! `port` is the seam the HTTP adapter implements; `client` layers credential
//! fallback and photo selection on top of it.

pub mod client;
pub mod port;
pub mod types;

pub use client::CatalogLookupClient;
pub use port::CatalogPort;
