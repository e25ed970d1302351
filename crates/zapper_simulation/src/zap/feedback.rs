//! Zap events — ECS → host (presentation, gameplay)
//!
//! Architecture:
//! - ECS: ZapController решает КОГДА (edge, acquire, cancel, completion)
//! - Host: particles / audio / animator / haptics — fire-and-forget, ответ не читаем
//! - Events: ZapFeedback (presentation), ZapStarted/ZapCancelled/ItemZapped/ZapAwardRejected (gameplay)

use bevy::prelude::*;

use crate::item_system::ItemPayload;

/// Haptic команда для контроллера игрока
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HapticCue {
    /// Короткий pulse при захвате target (fire-and-forget, host гасит его сам
    /// через `duration` секунд; `Stop` обрывает раньше)
    Pulse {
        motor: u8,
        intensity: f32,
        duration: f32,
    },
    /// Остановить вибрацию
    Stop,
}

/// Presentation команда (fire-and-forget)
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCue {
    /// Shooting particles: play (true) / stop (false)
    Particles(bool),
    /// Zap audio loop: play / stop
    Audio(bool),
    /// Animator bool параметр
    AnimatorFlag { name: String, value: bool },
    Haptic(HapticCue),
}

/// Почему zap прерван
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum CancelReason {
    /// Триггер отпущен
    TriggerReleased,
    /// Target дальше zap_range
    OutOfRange,
    /// Probe не попал в target (прицел ушёл / перекрыт)
    LostLineOfSight,
    /// Target entity исчез из мира
    TargetLost,
    /// Zapper сброшен (respawn)
    Reset,
}

impl CancelReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelReason::TriggerReleased => "trigger released",
            CancelReason::OutOfRange => "out of range",
            CancelReason::LostLineOfSight => "lost line of sight",
            CancelReason::TargetLost => "target lost",
            CancelReason::Reset => "reset",
        }
    }
}

/// Event: presentation cue для конкретного zapper'а
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ZapFeedback {
    pub zapper: Entity,
    pub cue: PresentationCue,
}

/// Event: zapper захватил target
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ZapStarted {
    pub zapper: Entity,
    pub target: Entity,
    /// Стал ли zapper owner'ом (первый захват)
    pub claimed_ownership: bool,
}

/// Event: zap прерван до completion
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ZapCancelled {
    pub zapper: Entity,
    pub target: Entity,
    pub reason: CancelReason,
}

/// Event: предмет zap'нут и принят award service (entity despawn'ится)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ItemZapped {
    pub zapper: Entity,
    pub item: Entity,
    pub payload: ItemPayload,
}

/// Event: dwell завершён, но award service отказал (предмет остаётся)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ZapAwardRejected {
    pub zapper: Entity,
    pub item: Entity,
    pub payload: ItemPayload,
}

/// Event (host → ECS): сброс zapper'а (respawn / scene reload)
///
/// Обрабатывается в `zap_tick`: target отпускается (cancel с `CancelReason::Reset`),
/// dwell и флаг триггера обнуляются. Чтобы снова zap'ать, нужен новый press.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZapReset {
    pub zapper: Entity,
}
