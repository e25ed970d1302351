//! Collision Layers Constants
//!
//! Rapier `Group` битовые маски — centralised constants для всего проекта.
//!
//! ## Архитектура:
//! - **Memberships:** на каком слое находится collider (`CollisionGroups::memberships`)
//! - **Exclude mask:** какие слои zap probe пропускает
//!
//! ## Layers:
//! - GROUP_1: Default (collider без `CollisionGroups` — probe его видит)
//! - GROUP_2: Players (zapper'ы — probe их игнорирует)
//! - GROUP_3: Items (Interactable)
//! - GROUP_4: Environment (стены, препятствия — блокируют line-of-sight)
//!
//! ## Использование:
//! ```ignore
//! use zapper_simulation::layers::*;
//!
//! commands.spawn((ZapCollider::new(0.5), collision_groups(LAYER_ITEMS)));
//! ```

use bevy_rapier3d::prelude::{CollisionGroups, Group};

// ============================================================================
// Layer битовые маски (на каком слое collider находится)
// ============================================================================

/// Default: collider без `CollisionGroups` компонента
pub const LAYER_DEFAULT: Group = Group::GROUP_1;

/// Players (zapper entities)
pub const LAYER_PLAYERS: Group = Group::GROUP_2;

/// Items (Interactable)
pub const LAYER_ITEMS: Group = Group::GROUP_3;

/// Environment (walls, obstacles)
pub const LAYER_ENVIRONMENT: Group = Group::GROUP_4;

// ============================================================================
// Probe маски
// ============================================================================

/// Zap probe не видит игроков (в том числе самого стреляющего)
pub const ZAP_PROBE_EXCLUDE: Group = LAYER_PLAYERS;

// ============================================================================
// Helper Functions
// ============================================================================

/// CollisionGroups для collider на одном слое (filters = ALL)
pub fn collision_groups(layer: Group) -> CollisionGroups {
    CollisionGroups::new(layer, Group::ALL)
}

/// Получить название слоя для debug логов
pub fn get_layer_name(layer: Group) -> &'static str {
    if layer == LAYER_DEFAULT {
        "Default"
    } else if layer == LAYER_PLAYERS {
        "Players"
    } else if layer == LAYER_ITEMS {
        "Items"
    } else if layer == LAYER_ENVIRONMENT {
        "Environment"
    } else {
        "Unknown"
    }
}
