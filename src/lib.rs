// src/lib.rs

//! termsnap: daily FHIR terminology metadata snapshots

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
