//! Zap probe — sphere-cast вперёд от дула
//!
//! `ZapProbe` — seam для геометрического сервиса (движок может подставить свой).
//! `ColliderProbe` — headless реализация: снапшот sphere collider'ов + аналитический
//! sweep (sphere vs sphere == ray vs sphere радиуса r + R).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::components::AimSource;
use crate::layers::ZAP_PROBE_EXCLUDE;
use super::config::ZapConfig;

/// Параметры sphere-cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec3,
    /// Единичный вектор
    pub direction: Vec3,
    pub radius: f32,
    pub max_distance: f32,
    /// Слои, которые probe пропускает
    pub exclude: Group,
}

impl ProbeRay {
    /// Probe из прицела: старт на `probe_start_offset` впереди дула.
    ///
    /// None если прицел вырожден (muzzle == aim_point).
    pub fn from_aim(aim: &AimSource, config: &ZapConfig, max_distance: f32) -> Option<Self> {
        let direction = aim.direction()?;
        Some(Self {
            origin: aim.muzzle + direction * config.probe_start_offset,
            direction,
            radius: config.probe_radius,
            max_distance,
            exclude: ZAP_PROBE_EXCLUDE,
        })
    }
}

/// Попадание probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub entity: Entity,
    /// Точка контакта (world space)
    pub point: Vec3,
    /// Дистанция sweep от origin (0 = пересечение на старте)
    pub distance: f32,
    /// Memberships collider'а (для debug логов)
    pub layer: Group,
}

/// Геометрический probe сервис
pub trait ZapProbe {
    /// Все попадания, отсортированные по дистанции
    fn cast(&self, ray: &ProbeRay) -> Vec<ProbeHit>;

    /// Ближайшее попадание
    fn first_hit(&self, ray: &ProbeRay) -> Option<ProbeHit> {
        self.cast(ray).into_iter().next()
    }
}

/// Sphere в снапшоте probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeShape {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
    pub memberships: Group,
}

/// Headless probe по sphere collider'ам
///
/// Снапшот собирается один раз за system run (позиции внутри тика не меняются).
#[derive(Debug, Clone, Default)]
pub struct ColliderProbe {
    pub shapes: Vec<ProbeShape>,
}

impl ColliderProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity, center: Vec3, radius: f32, memberships: Group) {
        self.shapes.push(ProbeShape {
            entity,
            center,
            radius,
            memberships,
        });
    }
}

impl ZapProbe for ColliderProbe {
    fn cast(&self, ray: &ProbeRay) -> Vec<ProbeHit> {
        let mut hits: Vec<ProbeHit> = self
            .shapes
            .iter()
            .filter(|shape| !shape.memberships.intersects(ray.exclude))
            .filter_map(|shape| {
                let distance = sweep_sphere(ray, shape.center, shape.radius)?;
                let swept_center = ray.origin + ray.direction * distance;
                let normal = (shape.center - swept_center).normalize_or_zero();
                Some(ProbeHit {
                    entity: shape.entity,
                    point: swept_center + normal * ray.radius,
                    distance,
                    layer: shape.memberships,
                })
            })
            .collect();

        // Детерминизм: дистанция, потом Entity index
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.entity.index().cmp(&b.entity.index()))
        });
        hits
    }
}

/// Дистанция sweep до первого контакта сферы probe со сферой (center, radius)
///
/// - Пересечение на старте → Some(0.0)
/// - Сфера позади / мимо / дальше max_distance → None
pub fn sweep_sphere(ray: &ProbeRay, center: Vec3, radius: f32) -> Option<f32> {
    let combined = ray.radius + radius;
    let offset = ray.origin - center;
    let c = offset.length_squared() - combined * combined;

    if c <= 0.0 {
        return Some(0.0);
    }

    let b = offset.dot(ray.direction);
    if b > 0.0 {
        // Смотрим от сферы
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = -b - discriminant.sqrt();
    if distance < 0.0 || distance > ray.max_distance {
        return None;
    }
    Some(distance)
}
