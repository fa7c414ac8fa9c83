//! Short-lived death markers kept for presentation.

use argent_core::{DeathEffectSnapshot, EnemyKind};
use glam::Vec2;

/// Ticks a death marker stays visible.
const DEATH_EFFECT_TICKS: u32 = 45;

#[derive(Clone, Debug)]
pub(crate) struct DeathEffect {
    kind: EnemyKind,
    appearance: EnemyKind,
    position: Vec2,
    remaining_ticks: u32,
}

impl DeathEffect {
    pub(crate) fn new(kind: EnemyKind, appearance: EnemyKind, position: Vec2) -> Self {
        Self {
            kind,
            appearance,
            position,
            remaining_ticks: DEATH_EFFECT_TICKS,
        }
    }

    pub(crate) fn snapshot(&self) -> DeathEffectSnapshot {
        DeathEffectSnapshot {
            kind: self.kind,
            appearance: self.appearance,
            position: self.position,
            remaining_ticks: self.remaining_ticks,
        }
    }
}

/// Ages every marker by one tick and drops the finished ones.
pub(crate) fn advance(effects: &mut Vec<DeathEffect>) {
    for effect in effects.iter_mut() {
        effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
    }
    effects.retain(|effect| effect.remaining_ticks > 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_expire_after_their_lifetime() {
        let mut effects = vec![DeathEffect::new(EnemyKind::Snake, EnemyKind::Spider, Vec2::ONE)];
        for _ in 0..DEATH_EFFECT_TICKS - 1 {
            advance(&mut effects);
        }
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].snapshot().remaining_ticks, 1);

        advance(&mut effects);
        assert!(effects.is_empty());
    }
}
