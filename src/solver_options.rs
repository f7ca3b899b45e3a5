use crate::qubo_builder::PenaltyWeights;

/// Options for the exhaustive solver at run time
#[derive(Debug, Clone)]
pub struct SolverOptions {
    pub penalties: PenaltyWeights,
    pub threads: usize,
    pub max_variables: usize,
    pub max_evaluations: Option<u64>,
    pub max_time: Option<f64>,
    pub verbose: usize,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self {
            penalties: PenaltyWeights::default(),
            threads: 1,
            max_variables: 36,
            max_evaluations: None,
            max_time: None,
            verbose: 1,
        }
    }

    pub fn set_penalties(&mut self, a: Option<f64>, b: Option<f64>) {
        if let Some(a) = a {
            self.penalties.a = a;
        }
        if let Some(b) = b {
            self.penalties.b = b;
        }
    }

    /// Zero threads means one per available core.
    pub fn set_threads(&mut self, threads: usize) {
        self.threads = match threads {
            0 => std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
            t => t,
        };
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::new()
    }
}
