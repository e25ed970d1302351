//! Zap module — "навёл, держи триггер, собрал"
//!
//! ECS ответственность:
//! - ZapController state machine (trigger edge, acquire, validate, dwell)
//! - Probe по ZapCollider'ам (headless sphere-cast)
//! - Events: ZapFeedback, ZapStarted, ZapCancelled, ItemZapped, ZapAwardRejected
//! - Input event: ZapReset (respawn)
//!
//! Host ответственность:
//! - Пишет TriggerButton / AimSource каждый frame
//! - Играет particles / audio / animator / haptics по ZapFeedback
//! - Инжектит AwardService через ZapAwards resource
//! - Шлёт ZapReset при respawn zapper'а

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod probe;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod controller_tests;

// Re-export основных типов
pub use config::ZapConfig;
pub use controller::{ZapContext, ZapController, ZapOutput, ZapperView};
pub use error::{ZapConfigError, ZapSetupError};
pub use feedback::{
    CancelReason, HapticCue, ItemZapped, PresentationCue, ZapAwardRejected, ZapCancelled,
    ZapFeedback, ZapReset, ZapStarted,
};
pub use probe::{sweep_sphere, ColliderProbe, ProbeHit, ProbeRay, ProbeShape, ZapProbe};
pub use systems::zap_tick;

use crate::item_system::ZapAwards;

/// SystemSet для zap систем (host ставит input системы `.before(ZapSet)`)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZapSet;

/// Zap Plugin
///
/// Регистрирует zap_tick в FixedUpdate (один тик = один fixed step).
/// Config валидируется при создании plugin'а, не в тике.
#[derive(Clone)]
pub struct ZapPlugin {
    config: ZapConfig,
}

impl ZapPlugin {
    pub fn new(config: ZapConfig) -> Result<Self, ZapConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ZapConfig {
        &self.config
    }
}

impl Default for ZapPlugin {
    fn default() -> Self {
        Self {
            config: ZapConfig::default(),
        }
    }
}

impl Plugin for ZapPlugin {
    fn build(&self, app: &mut App) {
        // Host мог заранее вставить ZapAwards со своим сервисом — не перетираем
        app.insert_resource(self.config.clone())
            .init_resource::<ZapAwards>();

        // Регистрация событий
        app.add_event::<ZapFeedback>()
            .add_event::<ZapStarted>()
            .add_event::<ZapCancelled>()
            .add_event::<ItemZapped>()
            .add_event::<ZapAwardRejected>()
            .add_event::<ZapReset>();

        app.add_systems(FixedUpdate, zap_tick.in_set(ZapSet));
    }
}
