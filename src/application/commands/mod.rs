// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between a front end and the services
// - Commands accept plain values, return DTOs
// - Commands convert every failure into an ErrorResponse
// - Commands NEVER contain business logic

/// Binds `$t` to the entity struct of a runtime `EntityKind` and evaluates
/// `$body` with it, so generic services can be driven from a parsed kind.
macro_rules! with_entity_type {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            $crate::domain::EntityKind::Character => {
                type $t = $crate::domain::CharacterInfo;
                $body
            }
            $crate::domain::EntityKind::Issue => {
                type $t = $crate::domain::IssueInfo;
                $body
            }
            $crate::domain::EntityKind::Volume => {
                type $t = $crate::domain::VolumeInfo;
                $body
            }
            $crate::domain::EntityKind::Concept => {
                type $t = $crate::domain::ConceptInfo;
                $body
            }
            $crate::domain::EntityKind::Location => {
                type $t = $crate::domain::LocationInfo;
                $body
            }
            $crate::domain::EntityKind::Movie => {
                type $t = $crate::domain::MovieInfo;
                $body
            }
            $crate::domain::EntityKind::Object => {
                type $t = $crate::domain::ObjectInfo;
                $body
            }
            $crate::domain::EntityKind::Person => {
                type $t = $crate::domain::PersonInfo;
                $body
            }
            $crate::domain::EntityKind::StoryArc => {
                type $t = $crate::domain::StoryArcInfo;
                $body
            }
            $crate::domain::EntityKind::Team => {
                type $t = $crate::domain::TeamInfo;
                $body
            }
        }
    };
}

pub mod browse_commands;
pub mod search_commands;
pub mod settings_commands;

pub use browse_commands::*;
pub use search_commands::*;
pub use settings_commands::*;
