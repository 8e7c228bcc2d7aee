use terrain_pathfinding::glam::{Vec2, Vec3};
use terrain_pathfinding::prelude::*;

use std::sync::atomic::{AtomicUsize, Ordering};

fn bounds() -> TerrainBounds {
    TerrainBounds::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0))
}

fn flat() -> FnTerrain<impl Fn(Vec3) -> f32, impl Fn(Vec3) -> f32> {
    FnTerrain::new(|_| 0.0, |_| 0.0)
}

/// Steep ground within `radius` of `center`, flat everywhere else
fn rock(center: Vec2, radius: f32) -> FnTerrain<impl Fn(Vec3) -> f32, impl Fn(Vec3) -> f32> {
    FnTerrain::new(
        |_| 0.0,
        move |p: Vec3| {
            if Vec2::new(p.x, p.z).distance(center) < radius {
                60.0
            } else {
                0.0
            }
        },
    )
}

/// Counts every call into the terrain
struct CountingTerrain {
    samples: AtomicUsize,
}

impl CountingTerrain {
    fn new() -> Self {
        CountingTerrain {
            samples: AtomicUsize::new(0),
        }
    }
    fn samples(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

impl TerrainSampler for CountingTerrain {
    fn sample_height(&self, _: Vec3) -> f32 {
        self.samples.fetch_add(1, Ordering::SeqCst);
        0.0
    }
    fn slope_angle(&self, _: Vec3) -> f32 {
        self.samples.fetch_add(1, Ordering::SeqCst);
        0.0
    }
}

fn assert_monotonic(path: &Path) {
    for pair in path.costs().windows(2) {
        assert!(pair[0] <= pair[1], "costs decrease: {:?}", path.costs());
    }
}

#[test]
fn flat_diagonal() {
    let mut pathfinder = PathFinder::astar(PathFindingSettings {
        cell_size: 1.0,
        max_iterations: 1000,
        distance_cost: 1.0,
        height_cost: 1.0,
        turn_cost: 1.0,
        distance_heuristic: 1.0,
        height_heuristic: 1.0,
        slope_heuristic: 1.0,
        ..Default::default()
    })
    .unwrap();

    let start = Vec3::new(0.0, 0.0, 0.0);
    let end = Vec3::new(10.0, 0.0, 10.0);
    let path = pathfinder.find_path(start, end, &flat(), &bounds());

    assert_eq!(path.status(), PathStatus::Found);
    assert!(!path.is_empty());
    assert!((path.length() - 200f32.sqrt()).abs() < 1e-3);
    assert_monotonic(&path);
    assert!(path.explored_nodes().len() < 1000);
    assert_eq!(path.start().unwrap().position(), start);
    assert_eq!(path.end().unwrap().position(), end);
}

#[test]
fn routes_around_steep_rock() {
    let center = Vec2::new(5.0, 5.0);
    let radius = 2.5;
    let mut pathfinder = PathFinder::astar(PathFindingSettings {
        max_slope_angle: 45.0,
        ..Default::default()
    })
    .unwrap();

    let path = pathfinder.find_path(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 10.0),
        &rock(center, radius),
        &bounds(),
    );

    assert_eq!(path.status(), PathStatus::Found);
    let outside = |node: &Node| node.position_2d().distance(center) >= radius;
    assert!(path.iter().all(outside));
    assert!(path.explored_nodes().iter().all(outside));
    assert!(path.open_nodes().iter().all(outside));
    assert!(path.length() > 200f32.sqrt() + 0.1);
    assert_monotonic(&path);
}

#[test]
fn min_height_above_terrain() {
    let mut pathfinder = PathFinder::astar(PathFindingSettings {
        min_height: 5.0,
        ..Default::default()
    })
    .unwrap();

    // the endpoints hover above the limit, but nothing in between does
    let path = pathfinder.find_path(
        Vec3::new(0.0, 10.0, 0.0),
        Vec3::new(8.0, 10.0, 3.0),
        &flat(),
        &bounds(),
    );
    assert!(path.is_empty());
    assert_eq!(path.status(), PathStatus::Unreachable);
    assert_eq!(path.explored_nodes().len(), 0);

    // endpoints on the ground are illegal themselves
    let path = pathfinder.find_path(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(8.0, 0.0, 3.0),
        &flat(),
        &bounds(),
    );
    assert_eq!(path.status(), PathStatus::Direct);
    assert_eq!(path.len(), 2);
}

#[test]
fn terminates_within_budget() {
    for max_iterations in [1, 2, 7, 30] {
        let mut pathfinder = PathFinder::astar(PathFindingSettings {
            max_iterations,
            ..Default::default()
        })
        .unwrap();
        let end = Vec3::new(45.0, 0.0, -45.0);
        let path = pathfinder.find_path(Vec3::ZERO, end, &flat(), &bounds());

        assert_eq!(path.status(), PathStatus::BudgetExhausted);
        assert_eq!(path.explored_nodes().len(), max_iterations);
        assert_eq!(path.end().unwrap().position(), end);
        assert_monotonic(&path);
    }
}

#[test]
fn unreachable_goal_terminates() {
    // two legal islands
    let a = Vec2::new(0.0, 0.0);
    let b = Vec2::new(10.0, 0.0);
    let terrain = FnTerrain::new(
        |_| 0.0,
        move |p: Vec3| {
            let p = Vec2::new(p.x, p.z);
            if p.distance(a) < 2.5 || p.distance(b) < 2.5 {
                0.0
            } else {
                80.0
            }
        },
    );
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    let path = pathfinder.find_path(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &terrain, &bounds());

    assert!(path.is_empty());
    assert_eq!(path.status(), PathStatus::Unreachable);
    assert_eq!(pathfinder.cached_paths(), 0);
}

#[test]
fn identical_endpoints() {
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    let p = Vec3::new(3.0, 1.0, -2.0);
    let path = pathfinder.find_path(p, p, &flat(), &bounds());

    assert!(path.is_empty());
    assert_eq!(path.status(), PathStatus::Degenerate);
}

#[test]
fn endpoints_off_grid() {
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    let start = Vec3::new(0.25, 0.0, -0.4);
    let end = Vec3::new(7.3, 0.0, 4.6);
    let path = pathfinder.find_path(start, end, &flat(), &bounds());

    assert_eq!(path.status(), PathStatus::Found);
    assert_eq!(path.start().unwrap().position(), start);
    assert_eq!(path.end().unwrap().position(), end);
    // every step is one cell, except for the last one that reaches the goal
    let nodes = path.nodes();
    for pair in nodes[..nodes.len() - 1].windows(2) {
        let step = pair[0].distance_2d(&pair[1]);
        assert!((step - 1.0).abs() < 1e-4 || (step - 2f32.sqrt()).abs() < 1e-4);
    }
}

#[test]
fn cache_skips_search() {
    let terrain = CountingTerrain::new();
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    let start = Vec3::new(-4.0, 0.0, 2.0);
    let end = Vec3::new(6.0, 0.0, -3.0);

    let first = pathfinder.find_path(start, end, &terrain, &bounds());
    let sampled = terrain.samples();
    assert!(sampled > 0);
    assert_eq!(pathfinder.cached_paths(), 1);

    let second = pathfinder.find_path(start, end, &terrain, &bounds());
    assert_eq!(terrain.samples(), sampled);
    assert_eq!(first.world_points(), second.world_points());
    assert_eq!(first, second);

    pathfinder.clean_cache();
    let third = pathfinder.find_path(start, end, &terrain, &bounds());
    assert!(terrain.samples() > sampled);
    assert_eq!(first.world_points(), third.world_points());
}

#[test]
fn cache_hit_in_same_cells() {
    let terrain = CountingTerrain::new();
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    pathfinder.find_path(
        Vec3::new(-4.0, 0.0, 2.0),
        Vec3::new(6.0, 0.0, -3.0),
        &terrain,
        &bounds(),
    );
    let sampled = terrain.samples();

    let start = Vec3::new(-4.003, 1.5, 2.002);
    let end = Vec3::new(6.004, 2.0, -2.996);
    let path = pathfinder.find_path(start, end, &terrain, &bounds());

    assert_eq!(terrain.samples(), sampled);
    assert_eq!(path.start().unwrap().position(), start);
    assert_eq!(path.end().unwrap().position(), end);
    assert_monotonic(&path);
}

#[test]
fn cache_disabled() {
    let terrain = CountingTerrain::new();
    let mut pathfinder = PathFinder::astar(PathFindingSettings {
        use_cache: false,
        ..Default::default()
    })
    .unwrap();
    let end = Vec3::new(6.0, 0.0, -3.0);

    pathfinder.find_path(Vec3::ZERO, end, &terrain, &bounds());
    let sampled = terrain.samples();
    pathfinder.find_path(Vec3::ZERO, end, &terrain, &bounds());

    assert_eq!(terrain.samples(), 2 * sampled);
    assert_eq!(pathfinder.cached_paths(), 0);
}

#[test]
fn checkerboard_legality() {
    // on odd cells, every other one is steep and the rest is too low
    let parity = |p: Vec3| (p.x.round() as i64 + p.z.round() as i64).rem_euclid(2);
    let terrain = FnTerrain::new(
        move |p: Vec3| {
            if parity(p) == 1 && (p.x.round() as i64).rem_euclid(2) == 1 {
                -5.0
            } else {
                0.0
            }
        },
        move |p: Vec3| {
            if parity(p) == 1 && (p.x.round() as i64).rem_euclid(2) == 0 {
                80.0
            } else {
                0.0
            }
        },
    );
    let settings = PathFindingSettings {
        min_height: -1.0,
        max_slope_angle: 45.0,
        ..Default::default()
    };
    let mut pathfinder = PathFinder::astar(settings).unwrap();

    let path = pathfinder.find_path(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(8.0, 0.0, 4.0),
        &terrain,
        &bounds(),
    );

    assert_eq!(path.status(), PathStatus::Found);
    let legal = |node: &Node| {
        node.slope_angle() <= settings.max_slope_angle && node.height() >= settings.min_height
    };
    assert!(path.iter().all(legal));
    assert!(path.explored_nodes().iter().all(legal));
    assert!(path.open_nodes().iter().all(legal));
}

#[test]
fn checkpoints_concatenate_segments() {
    let terrain = HeightField::from_fn((41, 41), 1.0, Vec2::new(-20.0, -20.0), |x, z| {
        ((x as f32) * 0.4).sin() * 1.5 + ((z as f32) * 0.3).cos()
    })
    .unwrap();
    let bounds = terrain.bounds();
    let a = Vec3::new(-8.0, 0.0, -8.0);
    let b = Vec3::new(6.0, 0.0, -2.0);
    let c = Vec3::new(-3.0, 0.0, 9.0);

    let mut chained = PathFinder::astar(Default::default()).unwrap();
    let path = chained.find_path_by_checkpoints(&[a, b, c], &terrain, &bounds);

    let mut single = PathFinder::astar(Default::default()).unwrap();
    let ab = single.find_path(a, b, &terrain, &bounds);
    let bc = single.find_path(b, c, &terrain, &bounds);

    let mut expected = ab.world_points();
    expected.extend(bc.world_points().into_iter().skip(1));

    assert_eq!(path.world_points(), expected);
    assert_eq!(path.status(), PathStatus::Found);
    assert!((path.cost() - (ab.cost() + bc.cost())).abs() < 1e-3);
    assert_eq!(
        path.explored_nodes().len(),
        ab.explored_nodes().len() + bc.explored_nodes().len()
    );
    assert_monotonic(&path);
    // both segments were cached along the way
    assert_eq!(chained.cached_paths(), 2);
}

#[test]
fn checkpoints_with_unreachable_segment() {
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    let terrain = rock(Vec2::new(20.0, 20.0), 4.0);
    // the middle checkpoint sits on a legal spot inside the rock
    let island = FnTerrain::new(
        |_| 0.0,
        |p: Vec3| {
            let d = Vec2::new(p.x, p.z).distance(Vec2::new(20.0, 20.0));
            if d < 0.5 {
                0.0
            } else {
                terrain.slope_angle(p)
            }
        },
    );
    let small = TerrainBounds::new(Vec2::new(-25.0, -25.0), Vec2::new(25.0, 25.0));
    let path = pathfinder.find_path_by_checkpoints(
        &[
            Vec3::ZERO,
            Vec3::new(20.0, 0.0, 20.0),
            Vec3::new(0.0, 0.0, 10.0),
        ],
        &island,
        &small,
    );

    assert!(path.is_empty());
    assert_eq!(path.status(), PathStatus::Unreachable);
}

#[test]
fn costs_stay_monotonic_on_hills() {
    let terrain = HeightField::from_fn((31, 31), 1.0, Vec2::ZERO, |x, z| {
        ((x as f32) * 0.5).sin() + ((z as f32) * 0.25).sin() * 2.0
    })
    .unwrap();
    let mut pathfinder = PathFinder::new(Astar, PathFindingSettings::SMOOTH).unwrap();
    let path = pathfinder.find_path(
        Vec3::new(2.0, 0.0, 2.0),
        Vec3::new(27.0, 0.0, 25.0),
        &terrain,
        &terrain.bounds(),
    );

    assert!(!path.is_empty());
    assert_monotonic(&path);
    assert_eq!(path.normalized_points(&terrain.bounds()).len(), path.len());
    assert!(path
        .normalized_points(&terrain.bounds())
        .iter()
        .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)));
}

#[test]
fn dijkstra_explores_more() {
    let start = Vec3::new(0.0, 0.0, 0.0);
    let end = Vec3::new(10.0, 0.0, 10.0);

    let mut astar = PathFinder::astar(Default::default()).unwrap();
    let mut dijkstra = PathFinder::dijkstra(Default::default()).unwrap();
    let fast = astar.find_path(start, end, &flat(), &bounds());
    let thorough = dijkstra.find_path(start, end, &flat(), &bounds());

    assert_eq!(thorough.status(), PathStatus::Found);
    assert!((thorough.length() - fast.length()).abs() < 1e-3);
    assert!(thorough.explored_nodes().len() > fast.explored_nodes().len());
}

#[test]
fn directional_reaches_goal() {
    let mut pathfinder = PathFinder::directional(Default::default()).unwrap();

    let end = Vec3::new(10.0, 0.0, 10.0);
    let path = pathfinder.find_path(Vec3::ZERO, end, &flat(), &bounds());
    assert_eq!(path.status(), PathStatus::Found);
    assert!((path.length() - 200f32.sqrt()).abs() < 1e-3);

    // same endpoints on a different terrain
    pathfinder.clean_cache();
    let center = Vec2::new(5.0, 5.0);
    let path = pathfinder.find_path(Vec3::ZERO, end, &rock(center, 2.0), &bounds());
    assert_eq!(path.status(), PathStatus::Found);
    assert!(path.iter().all(|node| node.position_2d().distance(center) >= 2.0));
    assert_eq!(path.end().unwrap().position(), end);
}

#[test]
fn path_directions_follow_steps() {
    let mut pathfinder = PathFinder::astar(Default::default()).unwrap();
    let path = pathfinder.find_path(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), &flat(), &bounds());

    assert_eq!(path.len(), 7);
    for node in path.iter().skip(1) {
        assert_eq!(node.direction(), Vec2::X);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_checkpoints_match_sequential() {
    let checkpoints = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(12.0, 0.0, 3.0),
        Vec3::new(12.0, 0.0, 3.0),
        Vec3::new(-6.0, 0.0, 14.0),
        Vec3::new(-20.0, 0.0, -10.0),
    ];
    let terrain = rock(Vec2::new(4.0, 8.0), 3.0);

    let mut sequential = PathFinder::astar(Default::default()).unwrap();
    let mut parallel = PathFinder::astar(Default::default()).unwrap();
    let a = sequential.find_path_by_checkpoints(&checkpoints, &terrain, &bounds());
    let b = parallel.par_find_path_by_checkpoints(&checkpoints, &terrain, &bounds());

    assert_eq!(a.world_points(), b.world_points());
    assert_eq!(a.status(), b.status());
    assert_eq!(parallel.cached_paths(), sequential.cached_paths());
}
