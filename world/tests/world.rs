use argent_core::{
    CellCoord, Command, EconomyConfig, EnemyKind, Event, Phase, PlacementError, TowerKind,
    WorldConfig,
};
use argent_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn rich_world(lives: u32, resources: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Configure {
            config: WorldConfig {
                economy: EconomyConfig { lives, resources },
                ..WorldConfig::default()
            },
        },
        &mut events,
    );
    world
}

fn spawn(world: &mut World, kind: EnemyKind, row: u32, events: &mut Vec<Event>) {
    world::apply(
        world,
        Command::SpawnEnemy {
            kind,
            appearance: kind,
            row,
            level: 1,
        },
        events,
    );
}

#[test]
fn lone_spider_crosses_an_empty_field() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut events = Vec::new();
    world::apply(&mut world, Command::SetPhase { phase: Phase::Play }, &mut events);
    spawn(&mut world, EnemyKind::Spider, 6, &mut events);

    let mut escaped_at = None;
    for _ in 0..2_000 {
        events.clear();
        world::tick(&mut world, &mut rng, &mut events);
        if events
            .iter()
            .any(|event| matches!(event, Event::EnemyEscaped { .. }))
        {
            escaped_at = Some(query::tick_index(&world));
            break;
        }
    }

    assert_eq!(escaped_at, Some(1096));
    assert_eq!(query::ledger(&world).lives, 19);
    assert_eq!(query::enemy_count(&world), 0);
}

#[test]
fn sealing_the_last_gap_is_refused() {
    let mut world = World::new();
    let mut events = Vec::new();
    for row in (0..12).filter(|row| *row != 6) {
        world::apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Dart,
                cell: CellCoord::new(5, row),
            },
            &mut events,
        );
    }
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::TowerPlaced { .. }))
            .count(),
        11
    );
    events.clear();

    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Dart,
            cell: CellCoord::new(5, 6),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::TowerPlacementRejected {
            kind: TowerKind::Dart,
            cell: CellCoord::new(5, 6),
            reason: PlacementError::WouldSeverPath,
        }]
    );
    assert_eq!(query::ledger(&world).resources, 200 - 110);
    assert_eq!(query::tower_at(&world, CellCoord::new(5, 6)), None);
    assert!(query::entrances_connected(&world));
    assert_eq!(query::exit_distance(&world, CellCoord::new(0, 6)), Some(17));
}

#[test]
fn random_construction_never_disconnects_the_entrance() {
    let mut world = rich_world(20, 1_000_000);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let grid = query::grid_config(&world);
    let mut events = Vec::new();

    for _ in 0..600 {
        let cell = CellCoord::new(rng.gen_range(0..grid.columns), rng.gen_range(0..grid.rows));
        let command = if rng.gen_bool(0.2) {
            Command::RemoveTower { cell }
        } else {
            Command::PlaceTower {
                kind: TowerKind::Dart,
                cell,
            }
        };
        world::apply(&mut world, command, &mut events);

        assert!(query::entrances_connected(&world));
        let route = query::shortest_route(&world, CellCoord::new(0, 6), false);
        assert!(route.is_some_and(|route| route.last() == Some(&CellCoord::new(17, 6))));
    }

    assert!(events.iter().any(|event| matches!(
        event,
        Event::TowerPlacementRejected {
            reason: PlacementError::WouldSeverPath,
            ..
        }
    )));
    for tower in query::towers(&world).iter() {
        assert_ne!(tower.cell.column(), 0, "entrance column stays clear");
        assert_ne!(tower.cell, CellCoord::new(17, 6), "exit cell stays clear");
    }
}

#[test]
fn losing_the_last_life_ends_the_game() {
    let mut world = rich_world(1, 200);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events = Vec::new();
    world::apply(&mut world, Command::SetPhase { phase: Phase::Play }, &mut events);
    spawn(&mut world, EnemyKind::Hawk, 6, &mut events);
    spawn(&mut world, EnemyKind::Hawk, 6, &mut events);
    events.clear();

    while query::phase(&world) == Phase::Play {
        world::tick(&mut world, &mut rng, &mut events);
        assert!(query::tick_index(&world) < 2_000, "hawks never escaped");
    }

    assert_eq!(query::phase(&world), Phase::GameOver);
    assert_eq!(query::ledger(&world).lives, 0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
            .count(),
        1,
        "the tick ends as soon as the game is lost"
    );
    assert_eq!(query::enemy_count(&world), 1);

    let frozen_at = query::tick_index(&world);
    events.clear();
    world::tick(&mut world, &mut rng, &mut events);
    assert!(events.is_empty());
    assert_eq!(query::tick_index(&world), frozen_at);
}

#[test]
fn identical_seeds_replay_identically() {
    fn run(seed: u64) -> Vec<Event> {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut events = Vec::new();
        for (column, row) in [(6, 5), (6, 7), (9, 6), (12, 4), (12, 8)] {
            world::apply(
                &mut world,
                Command::PlaceTower {
                    kind: TowerKind::Dart,
                    cell: CellCoord::new(column, row),
                },
                &mut events,
            );
        }
        world::apply(&mut world, Command::SetPhase { phase: Phase::Play }, &mut events);

        for step in 0..1_500 {
            if step % 90 == 0 {
                let kind = EnemyKind::REGULAR[step / 90 % EnemyKind::REGULAR.len()];
                spawn(&mut world, kind, 6, &mut events);
            }
            world::tick(&mut world, &mut rng, &mut events);
        }
        events
    }

    assert_eq!(run(11), run(11));
}
