use grid::Grid;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use wave_forge::{convert, MultiSpace, TilingAnalysis, WaveFunction};

/// Small terrain sample: water, sand and grass in bands.
const SAMPLE: &[&str] = &[
    "~~~~....",
    "~~~.....",
    "~~......",
    "~.....,,",
    "......,,",
    "....,,,,",
];

const OUTPUT_ROWS: usize = 16;
const OUTPUT_COLS: usize = 48;

fn main() {
    // ------------------------------- SETUP -------------------------------- //

    // Reshape the ASCII rows into a 2-D sample and learn its adjacencies and
    // tile frequencies.
    let cols = SAMPLE[0].len();
    let cells = SAMPLE
        .iter()
        .flat_map(|row| row.chars())
        .collect::<Vec<_>>();
    let sample = convert::sample_from_grid(&Grid::from_vec(cells, cols), [false, false]).unwrap();
    let analysis = TilingAnalysis::from_sample(&sample).unwrap();

    println!(
        "learned {} rules over {} tiles",
        analysis.rule_count(),
        analysis.tile_count()
    );

    // Wrap the columns so the generated band tiles seamlessly sideways.
    let output = MultiSpace::new(
        [0, 0].into(),
        [OUTPUT_ROWS as i64 - 1, OUTPUT_COLS as i64 - 1].into(),
        vec![false, true],
    )
    .unwrap();
    let mut wave_fn = WaveFunction::new(output, &analysis).unwrap();

    // ------------------------------ GENERATE ------------------------------ //

    // Contradictions reached mid-run are a matter of unlucky draws; retrying
    // with the next seed is the intended recovery.
    for seed in 0..32u64 {
        let mut wave = wave_fn.new_wave();
        let mut rng = ChaChaRng::seed_from_u64(seed);

        match wave_fn.run(&mut wave, &mut rng) {
            Ok(()) => {
                let map = convert::grid_from_wave(&wave).unwrap();
                for row in 0..map.rows() {
                    let line = (0..map.cols()).map(|col| map[(row, col)]).collect::<String>();
                    println!("{line}");
                }
                return;
            }
            Err(error) if error.is_probabilistic() => {
                println!("seed {seed} ran into a contradiction at {:?}, retrying", error.failed_pos());
            }
            Err(error) => panic!("generation cannot succeed: {error}"),
        }
    }
    println!("no seed out of 32 produced a tiling");
}
