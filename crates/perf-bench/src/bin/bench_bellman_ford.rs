use std::hint::black_box;
use std::time::Instant;

use cost_graph_core::{BellmanFordSolver, ShortestWalkSolver};
use perf_bench::*;

fn main() {
    let graph = ring_digraph(WALK_VERTICES, WALK_OUT_DEGREE);
    let target = (WALK_VERTICES - 1) as i64;

    let start_time = Instant::now();
    let result = BellmanFordSolver.lowest_cost_walk(black_box(&graph), 0, target);
    let elapsed_time = start_time.elapsed();

    let result = black_box(result);

    println!(
        "--- Bellman-Ford Benchmark Results ({} Vertices, {} Edges) ---",
        WALK_VERTICES,
        WALK_VERTICES * WALK_OUT_DEGREE
    );
    match result {
        Ok(walk) => println!("Walk cost: {} over {} edges", walk.cost, walk.len()),
        Err(e) => println!("Solver failed: {}", e),
    }
    println!("Elapsed Time: {:?}", elapsed_time);
}
