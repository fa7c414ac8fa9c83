#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use argent_core::{EnemyId, EnemyView, Phase, TowerId, TowerKind, TowerTarget, TowerView};
use glam::Vec2;

/// Tangent of the 22.5 degree half-angle of each cardinal firing cone.
const CONE_SLOPE: f32 = std::f32::consts::SQRT_2 - 1.0;

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Each tower picks the closest enemy strictly within range;
    /// towers that cannot fire diagonally only see enemies inside one of the
    /// four cardinal cones.
    pub fn handle(
        &mut self,
        phase: Phase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if phase != Phase::Play {
            return;
        }

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let diagonal = tower.kind.stats().fires_diagonally;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let offset = candidate.position - tower.center;
                let distance = offset.length();

                if distance >= tower.range {
                    continue;
                }

                if !diagonal && !within_cardinal_cone(offset) {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    enemy: candidate.id,
                    aim: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    aim: best_candidate.aim,
                    distance: best_candidate.distance,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            if snapshot.range <= 0.0 {
                continue;
            }

            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                kind: snapshot.kind,
                center: snapshot.center,
                range: snapshot.range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            if snapshot.health <= 0.0 {
                continue;
            }

            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

/// Reports whether the offset lies within 22.5 degrees of a cardinal axis.
fn within_cardinal_cone(offset: Vec2) -> bool {
    let dx = offset.x.abs();
    let dy = offset.y.abs();
    dy <= dx * CONE_SLOPE || dx <= dy * CONE_SLOPE
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    kind: TowerKind,
    center: Vec2,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    enemy: EnemyId,
    aim: Vec2,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::{TowerTarget, TowerTargeting};
    use argent_core::{
        CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, Phase, TowerId, TowerKind,
        TowerSnapshot, TowerView,
    };
    use glam::Vec2;

    const CELL: f32 = 10.0;

    fn tower_view(snapshots: Vec<TowerSnapshot>) -> TowerView {
        TowerView::from_snapshots(snapshots)
    }

    fn enemy_view(snapshots: Vec<EnemySnapshot>) -> EnemyView {
        EnemyView::from_snapshots(snapshots)
    }

    fn tower_snapshot(id: u32, kind: TowerKind, cell: (u32, u32)) -> TowerSnapshot {
        let stats = kind.stats();
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell: CellCoord::new(cell.0, cell.1),
            center: Vec2::new((cell.0 as f32 + 0.5) * CELL, (cell.1 as f32 + 0.5) * CELL),
            range: stats.range_cells * CELL,
            health: stats.max_health,
            max_health: stats.max_health,
            flash_ticks: 0,
        }
    }

    fn enemy_snapshot(id: u32, position: (f32, f32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Spider,
            appearance: EnemyKind::Spider,
            position: Vec2::new(position.0, position.1),
            cell: CellCoord::new((position.0 / CELL) as u32, (position.1 / CELL) as u32),
            lateral_offset: 0.0,
            health: 10.0,
            max_health: 10.0,
            level: 1,
            size: 8.0,
            frozen: false,
            attacking: false,
        }
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, TowerKind::Bullet, (4, 4))]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (65.0, 45.0))]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        let target = out[0];
        assert_eq!(target.tower, TowerId::new(1));
        assert_eq!(target.enemy, EnemyId::new(2));
        assert_eq!(target.aim, Vec2::new(65.0, 45.0));
        assert_eq!(target.distance, 20.0);
    }

    #[test]
    fn range_boundary_is_exclusive() {
        let mut system = TowerTargeting::new();
        let tower = tower_snapshot(1, TowerKind::Lightning, (0, 0));
        let edge = tower.center + Vec2::new(tower.range, 0.0);
        let towers = tower_view(vec![tower]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (edge.x, edge.y))]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn cardinal_towers_ignore_diagonal_enemies() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![
            tower_snapshot(1, TowerKind::Flame, (4, 4)),
            tower_snapshot(2, TowerKind::Lightning, (4, 4)),
        ]);
        let enemies = enemy_view(vec![enemy_snapshot(3, (55.0, 55.0))]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1, "only the diagonal-capable tower engages");
        assert_eq!(out[0].tower, TowerId::new(2));
    }

    #[test]
    fn cone_admits_enemies_slightly_off_axis() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, TowerKind::Flame, (4, 4))]);
        let enemies = enemy_view(vec![enemy_snapshot(3, (45.0 + 8.0, 45.0 + 3.0))]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1, "20.6 degrees off the east axis is inside the cone");
    }

    #[test]
    fn closest_enemy_wins() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, TowerKind::Fork, (5, 5))]);
        let enemies = enemy_view(vec![
            enemy_snapshot(1, (85.0, 55.0)),
            enemy_snapshot(2, (70.0, 55.0)),
            enemy_snapshot(3, (55.0, 90.0)),
        ]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn smaller_enemy_id_is_preferred_when_distances_match() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, TowerKind::Bullet, (2, 2))]);
        let enemies = enemy_view(vec![
            enemy_snapshot(20, (35.0, 25.0)),
            enemy_snapshot(10, (15.0, 25.0)),
        ]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(10));
    }

    #[test]
    fn non_play_phases_clear_output() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, TowerKind::Bullet, (0, 0))]);
        let enemies = enemy_view(vec![enemy_snapshot(1, (15.0, 5.0))]);

        for phase in [Phase::Build, Phase::Paused, Phase::GameOver] {
            let mut out = vec![TowerTarget {
                tower: TowerId::new(99),
                enemy: EnemyId::new(99),
                aim: Vec2::ZERO,
                distance: 0.0,
            }];

            system.handle(phase, &towers, &enemies, &mut out);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn empty_collections_produce_no_targets() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(Vec::new());
        let enemies = enemy_view(vec![enemy_snapshot(1, (15.0, 15.0))]);

        let mut out = Vec::new();
        system.handle(Phase::Play, &towers, &enemies, &mut out);
        assert!(out.is_empty());

        let towers = tower_view(vec![tower_snapshot(1, TowerKind::Bullet, (0, 0))]);
        let enemies = enemy_view(Vec::new());
        system.handle(Phase::Play, &towers, &enemies, &mut out);
        assert!(out.is_empty());
    }
}
