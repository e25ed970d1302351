//! Ошибки инициализации zap подсистемы
//!
//! Gameplay исходы (отпустил триггер, ушёл из range, потерял прицел, award rejected)
//! — это обычные переходы state machine (`CancelReason`), НЕ ошибки.
//! Здесь только precondition violations, которые ловим при старте.

use thiserror::Error;

/// Невалидный `ZapConfig`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZapConfigError {
    #[error("zap_threshold must be a positive finite number of seconds, got {0}")]
    InvalidThreshold(f32),

    #[error("zap_range must be a positive finite distance, got {0}")]
    InvalidRange(f32),

    #[error("probe_radius must be finite and non-negative, got {0}")]
    InvalidProbeRadius(f32),

    #[error("probe_start_offset must be finite and non-negative, got {0}")]
    InvalidProbeOffset(f32),

    #[error("haptic_intensity must be within [0, 1], got {0}")]
    InvalidHapticIntensity(f32),

    #[error("haptic_duration must be finite and non-negative, got {0}")]
    InvalidHapticDuration(f32),

    #[error("failed to parse zap config: {0}")]
    Parse(String),
}

/// Невалидная настройка zapper entity (aim source и т.п.)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZapSetupError {
    /// Muzzle и aim point совпадают — направление probe не определено
    #[error("aim source is degenerate: muzzle {muzzle:?} equals aim point")]
    DegenerateAim { muzzle: bevy::math::Vec3 },
}
