// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod browse_service;
pub mod search_service;

pub use browse_service::{BrowseService, BrowseSettings};
pub use search_service::{SearchRequest, SearchService};
