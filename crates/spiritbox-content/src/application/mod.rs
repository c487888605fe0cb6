//! Scenario ingestion: parsing, loading and fingerprinting.

pub mod ingest;
