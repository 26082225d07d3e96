//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: роли акторов (Player, Adversary) и их физическое тело (OverlapShape)
//! - movement: CharacterController игрока, NavAgent противника

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
