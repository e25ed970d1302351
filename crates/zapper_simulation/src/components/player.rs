//! Player компоненты: identity, триггер, прицел
//!
//! Host (движок / тест) каждый frame пишет `TriggerButton::set` и `AimSource::set`,
//! zap_tick только читает их. Lookup "player id → input" не нужен:
//! всё лежит на одном entity.

use bevy::prelude::*;

use crate::zap::error::ZapSetupError;

/// Stable ID игрока (для inventory / award service)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct PlayerId(pub u32);

/// Identity zapper'а
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ZapPlayer {
    pub player_id: PlayerId,
}

impl ZapPlayer {
    pub fn new(id: u32) -> Self {
        Self {
            player_id: PlayerId(id),
        }
    }
}

/// Edge триггера за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TriggerEdge {
    /// Нажали в этом тике
    Pressed,
    /// Отпустили в этом тике
    Released,
}

/// Состояние кнопки "Shoot"
///
/// Edge = разница между `pressed` (этот тик) и `was_pressed` (прошлый тик).
/// `latch()` вызывается после обработки тика, поэтому повторных edge нет.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TriggerButton {
    pub pressed: bool,
    pub was_pressed: bool,
}

impl TriggerButton {
    pub fn set(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn edge(&self) -> Option<TriggerEdge> {
        match (self.was_pressed, self.pressed) {
            (false, true) => Some(TriggerEdge::Pressed),
            (true, false) => Some(TriggerEdge::Released),
            _ => None,
        }
    }

    pub fn latch(&mut self) {
        self.was_pressed = self.pressed;
    }
}

/// Откуда и куда целится оружие
///
/// - `muzzle`: позиция дула (world space)
/// - `aim_point`: точка прицеливания от камеры (world space)
///
/// Probe direction = normalize(aim_point - muzzle).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AimSource {
    pub muzzle: Vec3,
    pub aim_point: Vec3,
}

impl Default for AimSource {
    fn default() -> Self {
        Self {
            muzzle: Vec3::ZERO,
            aim_point: Vec3::NEG_Z, // Bevy forward
        }
    }
}

impl AimSource {
    /// Fail fast: muzzle == aim_point не даёт направления
    pub fn new(muzzle: Vec3, aim_point: Vec3) -> Result<Self, ZapSetupError> {
        let aim = Self { muzzle, aim_point };
        if aim.direction().is_none() {
            return Err(ZapSetupError::DegenerateAim { muzzle });
        }
        Ok(aim)
    }

    pub fn set(&mut self, muzzle: Vec3, aim_point: Vec3) {
        self.muzzle = muzzle;
        self.aim_point = aim_point;
    }

    /// Единичный вектор muzzle → aim_point (None если вырожден)
    pub fn direction(&self) -> Option<Vec3> {
        (self.aim_point - self.muzzle).try_normalize()
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.muzzle.distance(point)
    }
}
