use std::hint::black_box;
use std::time::Instant;

use cost_graph_core::{HamiltonianCycleSolver, HeldKarpSolver};
use perf_bench::*;

fn main() {
    let graph = complete_digraph(TSP_VERTICES);
    let solver = HeldKarpSolver::new(TSP_VERTICES);

    let start_time = Instant::now();
    let result = solver.min_cost_cycle(black_box(&graph), 0);
    let elapsed_time = start_time.elapsed();

    let result = black_box(result);

    println!("--- Held-Karp Benchmark Results ({} Vertices) ---", TSP_VERTICES);
    match result {
        Ok(cycle) => println!("Tour cost: {} over {} vertices", cycle.cost, cycle.tour.len()),
        Err(e) => println!("Solver failed: {}", e),
    }
    println!("Elapsed Time: {:?}", elapsed_time);
}
