//! Command handlers

pub mod config;
pub mod dataset;
pub mod export;
pub mod stats;
