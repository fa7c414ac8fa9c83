//! Straight-line projectiles launched by towers.

use argent_core::{ProjectileId, ProjectileKind, ProjectileSnapshot};
use glam::Vec2;

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) position: Vec2,
    target: Vec2,
    pub(crate) damage: f32,
}

impl Projectile {
    pub(crate) fn launch(
        id: ProjectileId,
        kind: ProjectileKind,
        origin: Vec2,
        target: Vec2,
        damage: f32,
    ) -> Self {
        Self {
            id,
            kind,
            position: origin,
            target,
            damage,
        }
    }

    /// Moves toward the captured target point. Returns `true` once the
    /// remaining distance is shorter than a single tick of travel, in which
    /// case the projectile stays where it is.
    pub(crate) fn advance(&mut self) -> bool {
        let speed = self.kind.speed();
        let delta = self.target - self.position;
        let distance = delta.length();

        if distance < speed {
            return true;
        }

        self.position += delta / distance * speed;
        false
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            target: self.target,
        }
    }
}
