// src/integrations/comicvine/mod.rs

pub mod client;
pub mod response;

pub use client::{classify_transport_error, ComicVineApi, ComicVineClient};
pub use response::{ComicVineResponse, RawResponse, StatusCode};

#[cfg(test)]
pub use client::MockComicVineApi;
