// Host-side tests for node spawning and integration.

use glam::Vec3;
use plexus_core::constants::SPAWN_RADIUS_FRACTION;
use plexus_core::*;

const DT: f32 = 1.0 / 60.0;

fn spawn(config: &PaletteConfig, seed: u64) -> NodePool {
    let field = RandomField::new(seed);
    NodePool::spawn(
        config,
        &mut field.stream(Stream::Layout),
        &mut field.stream(Stream::Nodes),
    )
}

fn max_anchor_distance(pool: &NodePool) -> f32 {
    (0..pool.len())
        .filter_map(|i| pool.distance_to_anchor(i))
        .fold(0.0, f32::max)
}

#[test]
fn spawn_places_nodes_round_robin_near_their_anchor() {
    let config = Preset::Hero.config();
    let pool = spawn(&config, 42);
    assert_eq!(pool.len(), config.node_count);
    assert_eq!(pool.clusters().len(), config.cluster_count);
    let limit = config.slack_radius * SPAWN_RADIUS_FRACTION + 1e-5;
    for (i, node) in pool.nodes().iter().enumerate() {
        assert_eq!(node.cluster as usize, i % config.cluster_count);
        assert!(pool.distance_to_anchor(i).unwrap() <= limit);
        assert!(node.size >= config.node_size.0 && node.size <= config.node_size.1);
        assert_eq!(node.color, config.colors.cluster_color(node.cluster));
    }
    for cluster in pool.clusters() {
        assert!((0.0..=1.0).contains(&cluster.anchor.x));
        assert!((0.0..=1.0).contains(&cluster.anchor.y));
    }
}

#[test]
fn spawn_is_deterministic_per_seed() {
    let config = Preset::About.config();
    assert_eq!(spawn(&config, 9).nodes(), spawn(&config, 9).nodes());
    assert_ne!(spawn(&config, 9).nodes(), spawn(&config, 10).nodes());
}

#[test]
fn nodes_stay_bounded_over_ten_thousand_frames() {
    let config = Preset::Hero.config();
    let mut pool = spawn(&config, 42);
    for frame in 0..10_000 {
        pool.integrate(DT, None);
        if frame % 500 == 0 {
            let d = max_anchor_distance(&pool);
            assert!(d.is_finite() && d < config.slack_radius * 2.5, "frame {frame}: {d}");
        }
    }
    let d = max_anchor_distance(&pool);
    assert!(d < config.slack_radius * 2.5, "final distance {d}");
}

#[test]
fn nodes_stay_bounded_while_the_pointer_pulls() {
    let config = Preset::Services.config();
    let mut pool = spawn(&config, 3);
    let pointer = Some(Vec3::new(0.5, 0.5, 0.0));
    for _ in 0..10_000 {
        pool.integrate(DT, pointer);
    }
    let d = max_anchor_distance(&pool);
    assert!(d < 0.5, "pointer dragged a node {d} from its anchor");
}

#[test]
fn pointer_pulls_nodes_closer_than_without_it() {
    let config = Preset::Hero.config();
    let target = Vec3::new(0.5, 0.5, 0.0);
    let mut free = spawn(&config, 8);
    let mut pulled = spawn(&config, 8);
    for _ in 0..240 {
        free.integrate(DT, None);
        pulled.integrate(DT, Some(target));
    }
    let mean = |pool: &NodePool| {
        pool.nodes().iter().map(|n| n.position.distance(target)).sum::<f32>() / pool.len() as f32
    };
    assert!(mean(&pulled) < mean(&free));
}

#[test]
fn disabled_pointer_is_ignored() {
    let config = Preset::Hero.config();
    let mut touch = spawn(&config, 5);
    touch.set_pointer_enabled(false);
    assert!(!touch.pointer_enabled());
    let mut reference = spawn(&config, 5);
    for _ in 0..300 {
        touch.integrate(DT, Some(Vec3::new(0.0, 0.0, 0.0)));
        reference.integrate(DT, None);
    }
    assert_eq!(touch.nodes(), reference.nodes());
}

#[test]
fn zero_negative_and_nan_steps_are_no_ops() {
    let config = Preset::Hero.config();
    let mut pool = spawn(&config, 1);
    let before = pool.nodes().to_vec();
    pool.integrate(0.0, None);
    pool.integrate(-0.5, None);
    pool.integrate(f32::NAN, None);
    assert_eq!(pool.nodes(), &before[..]);
    assert_eq!(pool.time(), 0.0);
}

#[test]
fn time_accumulates_and_nodes_move() {
    let config = Preset::Hero.config();
    let mut pool = spawn(&config, 1);
    let before = pool.nodes().to_vec();
    for _ in 0..60 {
        pool.integrate(DT, None);
    }
    assert!((pool.time() - 1.0).abs() < 1e-4);
    assert_ne!(pool.nodes(), &before[..]);
}

#[test]
fn retint_changes_only_colors() {
    let config = Preset::Hero.config();
    let mut pool = spawn(&config, 4);
    let positions: Vec<Vec3> = pool.nodes().iter().map(|n| n.position).collect();
    let colors = ColorSet {
        base: vec![Rgb::new(1.0, 0.0, 0.0)],
        accents: vec![Rgb::WHITE],
        background: Rgb::new(0.0, 0.0, 0.0),
    };
    pool.retint(&colors);
    assert!(pool.nodes().iter().all(|n| n.color == Rgb::new(1.0, 0.0, 0.0)));
    let after: Vec<Vec3> = pool.nodes().iter().map(|n| n.position).collect();
    assert_eq!(positions, after);
}

#[test]
fn glow_stays_in_unit_range() {
    let config = Preset::Neural.config();
    let mut pool = spawn(&config, 2);
    for _ in 0..120 {
        pool.integrate(DT, None);
        for i in 0..pool.len() {
            let g = pool.glow(i);
            assert!((0.0..=1.0).contains(&g));
        }
    }
}
