//! Zap systems (FixedUpdate)
//!
//! zap_tick — единственная система: все zapper'ы обрабатываются последовательно
//! в одном run, поэтому first-claim на `Interactable::zapping_owner` без локов.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionGroups;

use crate::components::{AimSource, Interactable, PlayerId, TriggerButton, ZapCollider, ZapPlayer};
use crate::item_system::{ItemPayload, ZapAwards};
use crate::layers::LAYER_DEFAULT;
use crate::logger;
use super::config::ZapConfig;
use super::controller::{ZapContext, ZapController, ZapOutput, ZapperView};
use super::feedback::{
    ItemZapped, ZapAwardRejected, ZapCancelled, ZapFeedback, ZapReset, ZapStarted,
};
use super::probe::{ColliderProbe, ProbeHit, ProbeRay, ZapProbe};

/// Предметы: Interactable + позиция
pub type ZapItemQuery<'w, 's> = Query<'w, 's, (&'static mut Interactable, &'static Transform)>;

/// ZapContext поверх ECS queries (живёт один тик одного zapper'а)
struct EcsZapContext<'a, 'w, 's> {
    probe: &'a ColliderProbe,
    items: &'a mut ZapItemQuery<'w, 's>,
    awards: &'a mut ZapAwards,
    /// Предметы, уже zap'нутые в этом run (despawn отложен через Commands)
    consumed: &'a [Entity],
    outputs: Vec<ZapOutput>,
}

impl ZapContext for EcsZapContext<'_, '_, '_> {
    fn first_hit(&self, ray: &ProbeRay) -> Option<ProbeHit> {
        self.probe
            .cast(ray)
            .into_iter()
            .find(|hit| !self.consumed.contains(&hit.entity))
    }

    fn target_position(&self, target: Entity) -> Option<Vec3> {
        if self.consumed.contains(&target) {
            return None;
        }
        self.items
            .get(target)
            .ok()
            .map(|(_, transform)| transform.translation)
    }

    fn interactable_mut(&mut self, entity: Entity) -> Option<&mut Interactable> {
        if self.consumed.contains(&entity) {
            return None;
        }
        self.items
            .get_mut(entity)
            .ok()
            .map(|(item, _)| item.into_inner())
    }

    fn try_award(&mut self, player: PlayerId, payload: &ItemPayload) -> bool {
        self.awards.try_award(player, payload)
    }

    fn emit(&mut self, output: ZapOutput) {
        self.outputs.push(output);
    }
}

/// Снапшот collider'ов для probe (один раз за run)
///
/// Без `CollisionGroups` collider живёт на `LAYER_DEFAULT` (probe его не исключает).
pub fn build_collider_probe(
    colliders: &Query<(Entity, &Transform, &ZapCollider, Option<&CollisionGroups>)>,
) -> ColliderProbe {
    let mut probe = ColliderProbe::new();
    for (entity, transform, collider, groups) in colliders.iter() {
        let memberships = groups.map(|groups| groups.memberships).unwrap_or(LAYER_DEFAULT);
        probe.insert(entity, transform.translation, collider.radius, memberships);
    }
    probe
}

/// System: zap tick для всех zapper'ов
///
/// Порядок на zapper:
/// 1. edge из TriggerButton
/// 2. ZapReset для этого zapper'а → ZapController::reset (tick пропускается),
///    иначе ZapController::tick (edge → acquire/validate → dwell)
/// 3. outputs → events, accepted items → despawn
/// 4. latch кнопки (edge не повторится)
#[allow(clippy::too_many_arguments)]
pub fn zap_tick(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    config: Res<ZapConfig>,
    mut awards: ResMut<ZapAwards>,
    mut zappers: Query<(Entity, &mut ZapController, &mut TriggerButton, &AimSource, &ZapPlayer)>,
    mut items: ZapItemQuery,
    colliders: Query<(Entity, &Transform, &ZapCollider, Option<&CollisionGroups>)>,
    mut feedback_events: EventWriter<ZapFeedback>,
    mut started_events: EventWriter<ZapStarted>,
    mut cancelled_events: EventWriter<ZapCancelled>,
    mut zapped_events: EventWriter<ItemZapped>,
    mut rejected_events: EventWriter<ZapAwardRejected>,
    mut reset_requests: EventReader<ZapReset>,
) {
    let delta = time.delta_secs();
    let resets: Vec<Entity> = reset_requests.read().map(|request| request.zapper).collect();
    let probe = build_collider_probe(&colliders);
    let mut consumed: Vec<Entity> = Vec::new();

    for (zapper, mut controller, mut button, aim, player) in zappers.iter_mut() {
        let view = ZapperView {
            entity: zapper,
            player: player.player_id,
            aim,
            config: &config,
        };
        let edge = button.edge();

        let outputs = {
            let mut ctx = EcsZapContext {
                probe: &probe,
                items: &mut items,
                awards: &mut awards,
                consumed: &consumed,
                outputs: Vec::new(),
            };
            if resets.contains(&zapper) {
                logger::log_info(&format!("zapper {:?} reset", zapper));
                controller.reset(&mut ctx);
            } else {
                controller.tick(&view, edge, delta, &mut ctx);
            }
            ctx.outputs
        };
        button.latch();

        for output in outputs {
            match output {
                ZapOutput::Cue(cue) => {
                    feedback_events.write(ZapFeedback { zapper, cue });
                }
                ZapOutput::Started {
                    target,
                    claimed_ownership,
                } => {
                    logger::log_info(&format!(
                        "zapper {:?} (player {}) acquired {:?} (owner: {})",
                        zapper, player.player_id.0, target, claimed_ownership
                    ));
                    started_events.write(ZapStarted {
                        zapper,
                        target,
                        claimed_ownership,
                    });
                }
                ZapOutput::Cancelled { target, reason } => {
                    logger::log_info(&format!(
                        "zapper {:?} cancelled zap on {:?} at {:.0}%: {}",
                        zapper,
                        target,
                        controller.progress(&config) * 100.0,
                        reason.as_str()
                    ));
                    cancelled_events.write(ZapCancelled {
                        zapper,
                        target,
                        reason,
                    });
                }
                ZapOutput::Completed {
                    target,
                    payload,
                    awarded: true,
                } => {
                    logger::log_info(&format!(
                        "zapper {:?} (player {}) zapped {:?} → {:?} x{}",
                        zapper, player.player_id.0, target, payload.id.0, payload.stack_size
                    ));
                    consumed.push(target);
                    commands.entity(target).despawn();
                    zapped_events.write(ItemZapped {
                        zapper,
                        item: target,
                        payload,
                    });
                }
                ZapOutput::Completed {
                    target,
                    payload,
                    awarded: false,
                } => {
                    logger::log_warning(&format!(
                        "zapper {:?} (player {}): award rejected for {:?}, item stays",
                        zapper, player.player_id.0, payload.id.0
                    ));
                    rejected_events.write(ZapAwardRejected {
                        zapper,
                        item: target,
                        payload,
                    });
                }
            }
        }
    }
}
