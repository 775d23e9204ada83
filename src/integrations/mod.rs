// src/integrations/mod.rs
//
// External Integrations Module

pub mod comicvine;

pub use comicvine::{ComicVineApi, ComicVineClient, ComicVineResponse, RawResponse, StatusCode};
