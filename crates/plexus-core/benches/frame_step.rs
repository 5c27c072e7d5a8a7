use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use plexus_core::{GraphBuilder, Preset, RandomField, Scene, Stream};

fn step(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_step");
    for preset in [Preset::Hero, Preset::SpaceJourney] {
        let Ok(mut scene) = Scene::new(preset.config(), 42) else {
            continue;
        };
        group.bench_function(preset.name(), |b| b.iter(|| scene.step(black_box(1.0 / 60.0))));
    }
    group.finish();
}

fn build_graph(c: &mut Criterion) {
    let config = Preset::SpaceJourney.config();
    let Ok(scene) = Scene::new(config.clone(), 42) else {
        return;
    };
    let nodes = scene.nodes().nodes().to_vec();
    let builder = GraphBuilder::from_config(&config);
    c.bench_function("graph_build_space_journey", |b| {
        b.iter_batched(
            || RandomField::new(42).stream(Stream::Edges),
            |mut rng| builder.build(black_box(&nodes), &mut rng),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, step, build_graph);
criterion_main!(benches);
