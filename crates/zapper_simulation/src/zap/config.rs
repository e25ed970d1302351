//! ZapConfig — параметры zap механики (game data)
//!
//! Один resource на мир: все zapper'ы используют общий threshold/range.
//! Загружается из TOML (`from_toml_str`), отсутствующие ключи → defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::ZapConfigError;

/// Параметры zap механики
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct ZapConfig {
    /// Сколько секунд непрерывного dwell нужно для zap
    pub zap_threshold: f32,
    /// Max дистанция (muzzle → target) для захвата и удержания target
    pub zap_range: f32,
    /// Радиус sphere-cast probe (метры)
    pub probe_radius: f32,
    /// Probe стартует на `muzzle + direction * probe_start_offset`
    pub probe_start_offset: f32,
    /// Мотор для haptic pulse при захвате target
    pub haptic_motor: u8,
    /// Сила haptic pulse (0..1)
    pub haptic_intensity: f32,
    /// Длительность haptic pulse (секунды)
    pub haptic_duration: f32,
    /// Animator bool, который держится пока нажат триггер
    pub animator_flag: String,
}

impl Default for ZapConfig {
    fn default() -> Self {
        Self {
            zap_threshold: 1.0,
            zap_range: 10.0,
            probe_radius: 2.0,
            probe_start_offset: 2.0,
            haptic_motor: 0,
            haptic_intensity: 0.3,
            haptic_duration: 0.2,
            animator_flag: "Shooting".to_string(),
        }
    }
}

impl ZapConfig {
    /// Парсит TOML и сразу валидирует
    pub fn from_toml_str(source: &str) -> Result<Self, ZapConfigError> {
        let config: ZapConfig =
            toml::from_str(source).map_err(|err| ZapConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast: невалидный config не должен доехать до tick
    pub fn validate(&self) -> Result<(), ZapConfigError> {
        if !self.zap_threshold.is_finite() || self.zap_threshold <= 0.0 {
            return Err(ZapConfigError::InvalidThreshold(self.zap_threshold));
        }
        if !self.zap_range.is_finite() || self.zap_range <= 0.0 {
            return Err(ZapConfigError::InvalidRange(self.zap_range));
        }
        if !self.probe_radius.is_finite() || self.probe_radius < 0.0 {
            return Err(ZapConfigError::InvalidProbeRadius(self.probe_radius));
        }
        if !self.probe_start_offset.is_finite() || self.probe_start_offset < 0.0 {
            return Err(ZapConfigError::InvalidProbeOffset(self.probe_start_offset));
        }
        if !(0.0..=1.0).contains(&self.haptic_intensity) {
            return Err(ZapConfigError::InvalidHapticIntensity(self.haptic_intensity));
        }
        if !self.haptic_duration.is_finite() || self.haptic_duration < 0.0 {
            return Err(ZapConfigError::InvalidHapticDuration(self.haptic_duration));
        }
        Ok(())
    }
}
