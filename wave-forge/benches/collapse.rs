use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use wave_forge::{MultiArray, MultiSpace, TilingAnalysis, WaveFunction};

fn checker_sample(side: usize) -> MultiArray<u8> {
    let space = MultiSpace::from_lengths(&[side, side], false).unwrap();
    MultiArray::from_fn(space, |position| ((position[0] + position[1]) % 2) as u8)
}

fn analyze_checker_8x8(c: &mut Criterion) {
    let sample = checker_sample(8);

    c.bench_function("analyze_checker_8x8", |b| {
        b.iter(|| TilingAnalysis::from_sample(&sample).unwrap())
    });
}

fn collapse_checker_16x16(c: &mut Criterion) {
    let sample = checker_sample(4);
    let analysis = TilingAnalysis::from_sample(&sample).unwrap();
    let output = MultiSpace::from_lengths(&[16, 16], false).unwrap();
    let mut wave_fn = WaveFunction::new(output, &analysis).unwrap();

    c.bench_function("collapse_checker_16x16", |b| {
        b.iter(|| {
            let mut wave = wave_fn.new_wave();
            let mut rng = ChaChaRng::seed_from_u64(7);
            wave_fn.run(&mut wave, &mut rng).unwrap();
            wave
        })
    });
}

criterion_group!(benches, analyze_checker_8x8, collapse_checker_16x16);
criterion_main!(benches);
