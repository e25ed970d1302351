//! Sphere collider для headless zap probe

use bevy::prelude::*;

/// Сфера для sphere-cast probe (центр = Transform.translation)
///
/// Слой берётся из rapier `CollisionGroups` на том же entity (нет компонента → `LAYER_DEFAULT`).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ZapCollider {
    /// Радиус сферы (метры)
    pub radius: f32,
}

impl Default for ZapCollider {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

impl ZapCollider {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}
