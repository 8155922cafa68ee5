use std::hint::black_box;
use std::time::Instant;

use displayblock_labyrinth::{Labyrinth, LabyrinthConfig, TableRenderer, TextRenderer};

fn config(size: u32, seed: u64) -> LabyrinthConfig {
    LabyrinthConfig {
        width: size,
        height: size,
        seed,
        ..LabyrinthConfig::default()
    }
}

fn bench_generate(size: u32, iterations: usize) {
    let mut solved = 0;
    let start = Instant::now();
    for i in 0..iterations {
        let mut labyrinth = Labyrinth::with_config(config(size, i as u64));
        if black_box(labyrinth.generate()) {
            solved += 1;
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate ({size}x{size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}, solved {solved}/{iterations}"
    );
}

fn bench_is_solvable(size: u32, iterations: usize) {
    let mut labyrinth = Labyrinth::with_config(config(size, 1));
    labyrinth.generate();

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(black_box(&labyrinth).is_solvable());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  is_solvable ({size}x{size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_render(size: u32, iterations: usize) {
    let mut labyrinth = Labyrinth::with_config(config(size, 1));
    labyrinth.generate();
    let table = TableRenderer::new();
    let text = TextRenderer::new();

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(table.render(black_box(&labyrinth)).to_html());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  table html ({size}x{size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(text.render(black_box(&labyrinth)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  text ({size}x{size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== labyrinth benchmarks ===");
    for size in [16, 32, 64] {
        bench_generate(size, 20);
    }
    bench_is_solvable(64, 1_000);
    bench_render(32, 100);
}
