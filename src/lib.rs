// disavow-sieve: backlink spam triage and disavow file reconciliation.
//
// This is the library root. Modules follow the data flow: ingest and
// normalize exports, extract domains, classify, reconcile against the
// existing disavow file, and write the outputs.

pub mod anchors;
pub mod classify;
pub mod config;
pub mod disavow;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod records;

pub use error::DisavowError;
