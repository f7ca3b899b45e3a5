use crate::enumerate_qubo::SearchResult;
use log::info;

/// This is the main logic behind the solver output
///
/// It has varying levels of output, where 0 means nothing is logged, and each
/// additional level includes everything previous
///
/// 0 - Nothing
/// 1 - Header and Finish
/// 2 - Search layout and each improved chunk result
///
pub struct SolverOutputLogger {
    pub output_level: usize,
}

impl SolverOutputLogger {
    pub const fn new(level: usize) -> Self {
        Self {
            output_level: level,
        }
    }

    pub fn output_header(&self, num_x: usize, search_space: u64, threads: usize) {
        if self.output_level < 1 {
            return;
        }

        let version_number = env!("CARGO_PKG_VERSION");

        info!("tsp_qubo: exhaustive QUBO solver, version {version_number}");
        info!("Problem size: {num_x} variables");
        info!("Search space: {search_space} assignments");
        info!("Threads: {threads}");
    }

    pub fn output_layout(&self, num_chunks: u64, chunk_size: u64, limit: u64) {
        if self.output_level < 2 {
            return;
        }

        info!("Enumerating {limit} assignments in {num_chunks} chunks of up to {chunk_size}");
    }

    pub fn output_improvement(&self, evaluated: u64, energy: f64) {
        if self.output_level < 2 {
            return;
        }

        info!("{evaluated} evaluated | best energy {energy}");
    }

    pub fn generate_exit_line(&self, result: &SearchResult, time_passed: f64) {
        if self.output_level < 1 {
            return;
        }

        let best = result.best();
        let status = if result.is_optimal() {
            "optimal"
        } else {
            "incomplete"
        };
        info!("------------------------------------------------------");
        info!("Enumeration finished ({status})");
        info!("Best Solution Value: {}", best.energy);
        info!("Optimal Assignments: {}", best.degeneracy);
        info!("Assignments Evaluated: {}", best.evaluated);
        info!("Time to Solve: {time_passed:.3}s");
        info!("------------------------------------------------------");
    }
}
