//! ECS Components для zap механики
//!
//! Организация по доменам:
//! - player: identity, триггер, прицел (ZapPlayer, TriggerButton, AimSource)
//! - interactable: предметы для zap (Interactable)
//! - collider: геометрия для probe (ZapCollider)
//!
//! `ZapController` (state machine) живёт в `crate::zap`.

pub mod player;
pub mod interactable;
pub mod collider;

// Re-exports для удобного импорта
pub use player::*;
pub use interactable::*;
pub use collider::*;
