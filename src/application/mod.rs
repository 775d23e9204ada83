// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - This layer sits ABOVE the services
// - It is the boundary between a front end (the CLI) and the domain
// - It never reaches into repositories except through AppState wiring
// - It translates domain values into DTOs and errors into ErrorResponse

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use dto::*;
pub use error_handling::{CommandResult, ErrorResponse, ErrorType};
pub use state::AppState;
