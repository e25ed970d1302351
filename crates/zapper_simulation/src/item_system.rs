//! Item System — payload предметов и выдача их игроку
//!
//! # Архитектура
//!
//! **ItemPayload** — что получает игрок за zap:
//! - Хранится в `Interactable` компоненте предмета
//! - Копируется в момент completion (до despawn предмета)
//!
//! **AwardService** — внешний коллаборатор (inventory / game manager):
//! - Инжектится через `ZapAwards` resource (никаких global singleton'ов)
//! - `try_award` может отказать → предмет остаётся в мире
//! - Нет сервиса → каждый zap съедает предмет (сцены без game manager)
//!
//! # Пример использования
//!
//! ```ignore
//! app.insert_resource(ZapAwards::with_service(PlayerInventories::new(8)));
//! ```

use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::PlayerId;

// ============================================================================
// ItemId / ItemPayload
// ============================================================================

/// Item identifier (unique string ID)
///
/// # Examples
/// - "battery"
/// - "scrap_metal"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Что отдаёт предмет при успешном zap
#[derive(Clone, Debug, PartialEq, Eq, Reflect)]
pub struct ItemPayload {
    pub id: ItemId,
    pub stack_size: u32,
}

impl ItemPayload {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            stack_size: 1,
        }
    }

    pub fn with_stack(mut self, stack_size: u32) -> Self {
        self.stack_size = stack_size;
        self
    }
}

// ============================================================================
// AwardService
// ============================================================================

/// Внешний award/consume коллаборатор
///
/// `true` → предмет принят (будет уничтожен), `false` → отказ (предмет остаётся).
pub trait AwardService: Send + Sync + 'static {
    fn try_award(&mut self, player: PlayerId, payload: &ItemPayload) -> bool;
}

/// Resource: инжектированный award service
///
/// `None` = режим без game manager: completion всегда уничтожает предмет.
#[derive(Resource, Default)]
pub struct ZapAwards {
    pub service: Option<Box<dyn AwardService>>,
}

impl ZapAwards {
    pub fn with_service(service: impl AwardService) -> Self {
        Self {
            service: Some(Box::new(service)),
        }
    }

    /// Решение по payload (без сервиса — всегда accept)
    pub fn try_award(&mut self, player: PlayerId, payload: &ItemPayload) -> bool {
        match self.service.as_mut() {
            Some(service) => service.try_award(player, payload),
            None => true,
        }
    }
}

// ============================================================================
// PlayerInventories (reference AwardService)
// ============================================================================

/// Простые инвентари игроков с лимитом слотов
///
/// Один payload = один слот (stack_size не схлопываем).
#[derive(Debug, Clone, Default)]
pub struct PlayerInventories {
    pub capacity: usize,
    pub items: HashMap<PlayerId, Vec<ItemPayload>>,
}

impl PlayerInventories {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: HashMap::new(),
        }
    }

    pub fn items_of(&self, player: PlayerId) -> &[ItemPayload] {
        self.items.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_full(&self, player: PlayerId) -> bool {
        self.items_of(player).len() >= self.capacity
    }
}

impl AwardService for PlayerInventories {
    fn try_award(&mut self, player: PlayerId, payload: &ItemPayload) -> bool {
        if self.is_full(player) {
            return false;
        }
        self.items.entry(player).or_default().push(payload.clone());
        true
    }
}
