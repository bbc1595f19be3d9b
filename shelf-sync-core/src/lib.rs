#![doc = "shelf-sync-core: ingestion-and-sync pipeline for electronic shelf label price files."]

//! This crate holds all pipeline logic: reading dropped spreadsheets, turning
//! rows into sync records, fetching a bearer token, uploading records in
//! bounded batches, archiving processed files and purging old archives.
//! Networking is abstracted behind [`contract::EslTransport`]; the binary
//! crate supplies the HTTP implementation.
//!
//! # Usage
//! Build a [`config::SyncConfig`], wrap a transport in a [`watcher::Watcher`]
//! and call `run_cycle` or `run_until`.

pub mod archive;
pub mod auth;
pub mod config;
pub mod contract;
pub mod error;
pub mod retention;
pub mod spreadsheet;
pub mod transform;
pub mod upload;
pub mod watcher;

pub use error::{SyncError, SyncResult};
