// src/paging/mod.rs
//
// Paging layer
//
// Mediators translate page requests into fetch + cache writes; pagers
// serialise those loads and read the committed cache window back.

pub mod favorites_diff;
pub mod favorites_mediator;
pub mod mediator;
pub mod pager;

pub use favorites_diff::{DiffResult, FavoritesDiff};
pub use favorites_mediator::{FavoritesMediator, FavoritesWatcher};
pub use mediator::{
    EntityPageSource, LoadType, Mediator, MediatorResult, MediatorSuccess, PageSource,
    RemoteMediator,
};
pub use pager::Pager;
