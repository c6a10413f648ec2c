// src/internal/bench/mod.rs

//! Ranking functions by wall time over identical arguments.

use std::hint::black_box;
use std::time::{Duration, Instant};

pub const DEFAULT_ITERATIONS: u64 = 100_000;
pub const MAX_ITERATIONS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BenchError {
    #[error("Max iterations allowed is {max}, got {requested}")]
    TooManyIterations { requested: u64, max: u64 },
    #[error("no functions to compare")]
    NoFunctions,
}

/// Total time of one function over all iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub name: String,
    pub elapsed: Duration,
}

/// Timings sorted fastest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub iterations: u64,
    pub timings: Vec<Timing>,
}

impl Ranking {
    pub fn fastest(&self) -> Option<&Timing> {
        self.timings.first()
    }

    /// `"{name} is fastest: 1.16e-2 seconds over 100000 iterations"`, names
    /// right-aligned to the longest one.
    pub fn report_lines(&self) -> Vec<String> {
        let width = self
            .timings
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0);
        self.timings
            .iter()
            .enumerate()
            .map(|(i, timing)| {
                let status = if i == 0 { "fastest" } else { "slower" };
                format!(
                    "{:>width$} is {:<7}: {:.2e} seconds over {} iterations",
                    timing.name,
                    status,
                    timing.elapsed.as_secs_f64(),
                    self.iterations,
                    width = width
                )
            })
            .collect()
    }
}

/// Times each function `iterations` times against `args`.
pub fn compare<A, T>(
    functions: &[(&str, &dyn Fn(&A) -> T)],
    args: &A,
    iterations: u64,
) -> Result<Ranking, BenchError> {
    if iterations > MAX_ITERATIONS {
        return Err(BenchError::TooManyIterations {
            requested: iterations,
            max: MAX_ITERATIONS,
        });
    }
    if functions.is_empty() {
        return Err(BenchError::NoFunctions);
    }

    let mut timings: Vec<Timing> = functions
        .iter()
        .map(|(name, function)| {
            let start = Instant::now();
            for _ in 0..iterations {
                black_box(function(black_box(args)));
            }
            Timing {
                name: name.to_string(),
                elapsed: start.elapsed(),
            }
        })
        .collect();
    timings.sort_by_key(|timing| timing.elapsed);

    Ok(Ranking {
        iterations,
        timings,
    })
}

/// [`compare`] and print the report on stdout.
pub fn compare_performance<A, T>(
    functions: &[(&str, &dyn Fn(&A) -> T)],
    args: &A,
    iterations: u64,
) -> Result<Ranking, BenchError> {
    let ranking = compare(functions, args, iterations)?;
    for line in ranking.report_lines() {
        println!("{}", line);
    }
    Ok(ranking)
}
