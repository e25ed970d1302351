//! Interactable — предмет, который можно zap'нуть

use bevy::prelude::*;

use crate::components::ZapCollider;
use crate::item_system::ItemPayload;

/// Предмет, доступный для zap
///
/// Инварианты:
/// - `is_being_zapped == true` пока хотя бы один zapper держит предмет target'ом
/// - `zapping_owner` ставится ОДИН раз (первый захват), дальше не перезаписывается.
///   Это non-owning ссылка (Entity id), не владение.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, ZapCollider)]
pub struct Interactable {
    pub is_being_zapped: bool,
    pub zapping_owner: Option<Entity>,
    pub payload: ItemPayload,
}

impl Interactable {
    pub fn new(payload: ItemPayload) -> Self {
        Self {
            is_being_zapped: false,
            zapping_owner: None,
            payload,
        }
    }

    /// Захват target'а zapper'ом. Возвращает true если zapper стал owner'ом.
    ///
    /// Уже занятый предмет тоже помечается `is_being_zapped` (shared zap),
    /// owner остаётся прежним.
    pub fn claim(&mut self, zapper: Entity) -> bool {
        self.is_being_zapped = true;
        if self.zapping_owner.is_none() {
            self.zapping_owner = Some(zapper);
            return true;
        }
        false
    }

    pub fn release(&mut self) {
        self.is_being_zapped = false;
    }
}
