//! Headless симуляция ZAPPER
//!
//! Запускает Bevy App без рендера: один игрок по очереди наводится на
//! случайно разбросанные предметы и zap'ает их.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use zapper_simulation::layers::{collision_groups, LAYER_ITEMS, LAYER_PLAYERS};
use zapper_simulation::*;

const ITEM_COUNT: usize = 8;
const TICKS: usize = 1200;
/// Сколько тиков держим прицел на одном предмете
const TICKS_PER_TARGET: usize = 90;

/// Счётчики для отчёта
#[derive(Resource, Default)]
struct ZapStats {
    zapped: usize,
    rejected: usize,
    cancelled: usize,
}

fn count_zap_events(
    mut stats: ResMut<ZapStats>,
    mut zapped: EventReader<ItemZapped>,
    mut rejected: EventReader<ZapAwardRejected>,
    mut cancelled: EventReader<ZapCancelled>,
) {
    stats.zapped += zapped.read().count();
    stats.rejected += rejected.read().count();
    stats.cancelled += cancelled.read().count();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seed = 42;
    println!("Starting ZAPPER headless simulation (seed: {})", seed);

    let mut app = create_stepped_app(seed, Duration::from_secs_f64(1.0 / 60.0));
    app.insert_resource(ZapAwards::with_service(PlayerInventories::new(5)))
        .init_resource::<ZapStats>()
        .add_plugins(SimulationPlugin::new(ZapConfig::default())?)
        .add_systems(Update, count_zap_events);

    // Предметы в секторе перед игроком (детерминистично по seed)
    let positions: Vec<Vec3> = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        (0..ITEM_COUNT)
            .map(|_| {
                let angle: f32 = rng.rng.gen_range(-1.2..1.2);
                let distance: f32 = rng.rng.gen_range(3.0..9.0);
                Vec3::new(angle.sin() * distance, 1.0, -angle.cos() * distance)
            })
            .collect()
    };

    for (index, position) in positions.iter().enumerate() {
        app.world_mut().spawn((
            Interactable::new(ItemPayload::new(format!("battery_{}", index))),
            Transform::from_translation(*position),
            ZapCollider::new(0.5),
            collision_groups(LAYER_ITEMS),
        ));
    }

    let muzzle = Vec3::new(0.0, 1.0, 0.0);
    let player = app
        .world_mut()
        .spawn((
            ZapController::default(),
            ZapPlayer::new(1),
            AimSource::new(muzzle, muzzle + Vec3::NEG_Z)?,
            Transform::from_translation(muzzle),
            ZapCollider::new(0.5),
            collision_groups(LAYER_PLAYERS),
        ))
        .id();

    // Прогрев: первый update не двигает время (FixedUpdate не запускается)
    app.update();

    for tick in 0..TICKS {
        // Наводимся на следующий предмет каждые TICKS_PER_TARGET тиков
        let target_index = (tick / TICKS_PER_TARGET) % ITEM_COUNT;
        let aim_point = positions[target_index];

        if let Some(mut button) = app.world_mut().get_mut::<TriggerButton>(player) {
            button.set(true);
        }
        if let Some(mut aim) = app.world_mut().get_mut::<AimSource>(player) {
            aim.set(muzzle, aim_point);
        }

        app.update();

        if tick % 100 == 0 {
            let remaining = app
                .world_mut()
                .query::<&Interactable>()
                .iter(app.world())
                .count();
            println!("Tick {}: {} items left", tick, remaining);
        }
    }

    let stats = app.world().resource::<ZapStats>();
    println!(
        "Simulation complete! zapped: {}, rejected: {}, cancelled: {}",
        stats.zapped, stats.rejected, stats.cancelled
    );

    Ok(())
}
