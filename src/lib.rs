//! Batch topic classification for PDF collections.
//!
//! Extracts bounded text from every PDF in a folder, classifies the
//! documents in batches through the Google Gemini API into a
//! three-level topic hierarchy, and exports the results as JSON and
//! CSV.

pub mod aggregate;
pub mod batch;
pub mod cli;
pub mod classify;
pub mod config;
pub mod export;
pub mod extract;
pub mod models;
pub mod services;
