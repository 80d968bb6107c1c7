use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use petri_dish::game::{
    config::WorldConfig,
    input::Command,
    level::initialize_level,
    state::Scoreboard,
    tick::{tick, TickStatus},
};

const STEPS: u32 = 256;

fn scripted_input(t: u32) -> Option<Command> {
    match t % 6 {
        0 => Some(Command::FireSpray),
        3 => Some(Command::RotateLeft),
        _ => None,
    }
}

fn bench_level_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let config = WorldConfig::default();

    for level in [1u32, 4, 8] {
        group.bench_function(format!("level{}_steps{}", level, STEPS), |b| {
            b.iter_batched(
                || initialize_level(&config, Scoreboard { level, ..Scoreboard::default() }),
                |mut world| {
                    for t in 1..=STEPS {
                        if tick(&mut world, scripted_input(t), &config).status != TickStatus::Continue {
                            break;
                        }
                    }
                    black_box(world.compute_hash())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_level_setup(c: &mut Criterion) {
    let config = WorldConfig::default();
    c.bench_function("initialize_level1", |b| {
        b.iter(|| black_box(initialize_level(&config, Scoreboard::default())))
    });
}

criterion_group!(benches, bench_level_ticks, bench_level_setup);
criterion_main!(benches);
