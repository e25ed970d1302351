//! ZAPPER Simulation Core
//!
//! ECS-симуляция zap механики на Bevy 0.16 (headless).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = gameplay state (ZapController, Interactable, dwell timer, awards)
//! - Host = presentation (particles, audio, animator, haptics) через ZapFeedback events

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod components;
pub mod item_system;
pub mod layers;
pub mod logger;
pub mod zap;

// Re-export базовых типов для удобства
pub use components::*;
pub use item_system::{AwardService, ItemId, ItemPayload, PlayerInventories, ZapAwards};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use zap::{
    CancelReason, ItemZapped, ZapAwardRejected, ZapCancelled, ZapConfig, ZapConfigError,
    ZapController, ZapFeedback, ZapPlugin, ZapReset, ZapSet, ZapStarted,
};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub zap: ZapPlugin,
}

impl SimulationPlugin {
    pub fn new(config: ZapConfig) -> Result<Self, ZapConfigError> {
        Ok(Self {
            zap: ZapPlugin::new(config)?,
        })
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            zap: ZapPlugin::default(),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG (seed по умолчанию), если host не поставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins(self.zap.clone());
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (60Hz FixedUpdate, real time)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Headless App с ручным временем: каждый `app.update()` = ровно один fixed step.
///
/// Первый update — прогрев (delta = 0, FixedUpdate не запускается).
pub fn create_stepped_app(seed: u64, step: Duration) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(Time::<Fixed>::from_duration(step));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
