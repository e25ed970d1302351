//! ZapController — state machine zap механики
//!
//! Состояния:
//! - Idle: target нет, dwell убывает до 0
//! - Zapping: target захвачен, dwell растёт до zap_threshold
//!
//! Порядок тика (ZapController::tick):
//! 1. handle_trigger — edge триггера → presentation cues
//! 2. validate_or_cancel (есть target) ИЛИ probe_and_acquire (нет target)
//! 3. integrate_dwell — dwell timer + completion
//!
//! Внешний мир (probe, предметы, award service, cues) — через `ZapContext`.

use bevy::prelude::*;

use crate::components::{AimSource, Interactable, PlayerId, TriggerEdge, ZapPlayer, TriggerButton};
use crate::item_system::ItemPayload;
use crate::layers::get_layer_name;
use crate::logger;
use super::config::ZapConfig;
use super::feedback::{CancelReason, HapticCue, PresentationCue};
use super::probe::{ProbeHit, ProbeRay};

/// Что произошло за тик (system конвертирует в Bevy events)
#[derive(Debug, Clone, PartialEq)]
pub enum ZapOutput {
    Cue(PresentationCue),
    Started {
        target: Entity,
        claimed_ownership: bool,
    },
    Cancelled {
        target: Entity,
        reason: CancelReason,
    },
    /// Dwell дошёл до threshold. `awarded == false` → предмет остаётся в мире
    Completed {
        target: Entity,
        payload: ItemPayload,
        awarded: bool,
    },
}

/// Коллабораторы zapper'а на время одного тика
pub trait ZapContext {
    /// Ближайшее попадание probe
    fn first_hit(&self, ray: &ProbeRay) -> Option<ProbeHit>;

    /// Позиция target'а (None = entity исчез)
    fn target_position(&self, target: Entity) -> Option<Vec3>;

    /// Interactable на entity (None = это не предмет)
    fn interactable_mut(&mut self, entity: Entity) -> Option<&mut Interactable>;

    /// Award/consume коллаборатор
    fn try_award(&mut self, player: PlayerId, payload: &ItemPayload) -> bool;

    fn emit(&mut self, output: ZapOutput);
}

/// Read-only данные zapper'а на тик
#[derive(Debug, Clone, Copy)]
pub struct ZapperView<'a> {
    pub entity: Entity,
    pub player: PlayerId,
    pub aim: &'a AimSource,
    pub config: &'a ZapConfig,
}

/// Zap state machine (компонент на player entity)
///
/// Инварианты:
/// - `target.is_some()` ⇔ target.is_being_zapped (single zapper)
/// - dwell растёт только с target, убывает только без target, никогда < 0
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(ZapPlayer, TriggerButton, AimSource)]
pub struct ZapController {
    pub trigger_held: bool,
    pub target: Option<Entity>,
    /// Секунды накопленного dwell (0..=zap_threshold)
    pub dwell_elapsed: f32,
}

impl ZapController {
    pub fn is_zapping(&self) -> bool {
        self.target.is_some()
    }

    /// Прогресс zap 0..1 (для UI)
    pub fn progress(&self, config: &ZapConfig) -> f32 {
        (self.dwell_elapsed / config.zap_threshold).clamp(0.0, 1.0)
    }

    /// Один тик симуляции
    pub fn tick(
        &mut self,
        view: &ZapperView,
        edge: Option<TriggerEdge>,
        delta: f32,
        ctx: &mut dyn ZapContext,
    ) {
        self.handle_trigger(edge, view.config, ctx);

        if self.target.is_some() {
            self.validate_or_cancel(view, ctx);
        } else {
            self.probe_and_acquire(view, ctx);
        }

        self.integrate_dwell(view, delta, ctx);
    }

    /// Edge триггера → флаг + presentation cues
    ///
    /// Haptics здесь НЕ стартуют (только при захвате target), но стопаются на release.
    pub fn handle_trigger(
        &mut self,
        edge: Option<TriggerEdge>,
        config: &ZapConfig,
        ctx: &mut dyn ZapContext,
    ) {
        let Some(edge) = edge else {
            return;
        };

        let firing = edge == TriggerEdge::Pressed;
        self.trigger_held = firing;

        ctx.emit(ZapOutput::Cue(PresentationCue::Particles(firing)));
        ctx.emit(ZapOutput::Cue(PresentationCue::Audio(firing)));
        ctx.emit(ZapOutput::Cue(PresentationCue::AnimatorFlag {
            name: config.animator_flag.clone(),
            value: firing,
        }));
        if !firing {
            ctx.emit(ZapOutput::Cue(PresentationCue::Haptic(HapticCue::Stop)));
        }
    }

    /// Probe вперёд и захват первого Interactable
    ///
    /// Возвращает true если target захвачен.
    pub fn probe_and_acquire(&mut self, view: &ZapperView, ctx: &mut dyn ZapContext) -> bool {
        if self.target.is_some() || !self.trigger_held {
            return false;
        }

        let Some(ray) = ProbeRay::from_aim(view.aim, view.config, view.config.zap_range) else {
            logger::log(&format!(
                "zapper {:?}: degenerate aim, probe skipped",
                view.entity
            ));
            return false;
        };

        let Some(hit) = ctx.first_hit(&ray) else {
            return false;
        };

        // Первое попадание — не предмет (стена, и т.п.) → ничего не делаем
        let Some(item) = ctx.interactable_mut(hit.entity) else {
            logger::log(&format!(
                "zapper {:?}: probe blocked by {:?} ({})",
                view.entity,
                hit.entity,
                get_layer_name(hit.layer)
            ));
            return false;
        };

        let claimed_ownership = item.claim(view.entity);
        self.target = Some(hit.entity);

        ctx.emit(ZapOutput::Cue(PresentationCue::Haptic(HapticCue::Pulse {
            motor: view.config.haptic_motor,
            intensity: view.config.haptic_intensity,
            duration: view.config.haptic_duration,
        })));
        ctx.emit(ZapOutput::Started {
            target: hit.entity,
            claimed_ownership,
        });
        true
    }

    /// Проверка удержания target. Первое нарушенное условие → cancel.
    pub fn validate_or_cancel(
        &mut self,
        view: &ZapperView,
        ctx: &mut dyn ZapContext,
    ) -> Option<CancelReason> {
        let target = self.target?;
        let reason = self.check_target(target, view, ctx).err()?;
        self.cancel(reason, ctx);
        Some(reason)
    }

    /// Условия удержания (short-circuit, порядок важен):
    /// 1. триггер держится
    /// 2. target в пределах zap_range
    /// 3. probe до target попадает именно в target
    pub fn check_target(
        &self,
        target: Entity,
        view: &ZapperView,
        ctx: &dyn ZapContext,
    ) -> Result<(), CancelReason> {
        if !self.trigger_held {
            return Err(CancelReason::TriggerReleased);
        }

        let position = ctx.target_position(target).ok_or(CancelReason::TargetLost)?;
        let distance = view.aim.distance_to(position);
        if distance > view.config.zap_range {
            return Err(CancelReason::OutOfRange);
        }

        let ray = ProbeRay::from_aim(view.aim, view.config, distance)
            .ok_or(CancelReason::LostLineOfSight)?;
        match ctx.first_hit(&ray) {
            Some(hit) if hit.entity == target => Ok(()),
            _ => Err(CancelReason::LostLineOfSight),
        }
    }

    /// Cancel: stop haptics, release target. Dwell НЕ сбрасывается (убывает сам).
    pub fn cancel(&mut self, reason: CancelReason, ctx: &mut dyn ZapContext) {
        if let Some(target) = self.release_target(ctx) {
            ctx.emit(ZapOutput::Cancelled { target, reason });
        }
    }

    /// Dwell timer + completion
    pub fn integrate_dwell(&mut self, view: &ZapperView, delta: f32, ctx: &mut dyn ZapContext) {
        let Some(target) = self.target else {
            self.dwell_elapsed = (self.dwell_elapsed - delta).max(0.0);
            return;
        };

        self.dwell_elapsed += delta;
        if self.dwell_elapsed < view.config.zap_threshold {
            return;
        }

        // Completion: payload копируем ДО release, target отпускаем ДО award
        // (accepted award уничтожает предмет)
        let payload = ctx
            .interactable_mut(target)
            .map(|item| item.payload.clone());
        self.release_target(ctx);
        self.dwell_elapsed = 0.0;

        let Some(payload) = payload else {
            return;
        };
        let awarded = ctx.try_award(view.player, &payload);
        ctx.emit(ZapOutput::Completed {
            target,
            payload,
            awarded,
        });
    }

    /// Respawn / scene reload: всё transient состояние в ноль
    pub fn reset(&mut self, ctx: &mut dyn ZapContext) {
        self.cancel(CancelReason::Reset, ctx);
        self.trigger_held = false;
        self.dwell_elapsed = 0.0;
    }

    fn release_target(&mut self, ctx: &mut dyn ZapContext) -> Option<Entity> {
        let target = self.target.take()?;
        ctx.emit(ZapOutput::Cue(PresentationCue::Haptic(HapticCue::Stop)));
        if let Some(item) = ctx.interactable_mut(target) {
            item.release();
        }
        Some(target)
    }
}
