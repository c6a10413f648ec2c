use std::time::Duration;

use toolbox::internal::bench::{
    compare, BenchError, Ranking, Timing, DEFAULT_ITERATIONS, MAX_ITERATIONS,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn add(args: &(u64, u64)) -> u64 {
        args.0 + args.1
    }

    fn slow_add(args: &(u64, u64)) -> u64 {
        std::thread::sleep(Duration::from_micros(200));
        args.0 + args.1
    }

    #[test]
    fn test_fastest_first() {
        let functions: [(&str, &dyn Fn(&(u64, u64)) -> u64); 2] =
            [("slow_add", &slow_add), ("add", &add)];
        let ranking = compare(&functions, &(2, 3), 20).unwrap();

        assert_eq!(ranking.iterations, 20);
        assert_eq!(ranking.timings.len(), 2);
        assert_eq!(ranking.fastest().map(|t| t.name.as_str()), Some("add"));
        assert!(ranking.timings[0].elapsed <= ranking.timings[1].elapsed);
    }

    #[test]
    fn test_iteration_limit() {
        let functions: [(&str, &dyn Fn(&(u64, u64)) -> u64); 1] = [("add", &add)];

        assert_eq!(
            compare(&functions, &(1, 1), MAX_ITERATIONS + 1),
            Err(BenchError::TooManyIterations {
                requested: MAX_ITERATIONS + 1,
                max: MAX_ITERATIONS
            })
        );
        assert_eq!(DEFAULT_ITERATIONS, 100_000);
    }

    #[test]
    fn test_no_functions() {
        let functions: [(&str, &dyn Fn(&(u64, u64)) -> u64); 0] = [];

        assert_eq!(compare(&functions, &(1, 1), 10), Err(BenchError::NoFunctions));
    }

    #[test]
    fn test_report_lines_align_names() {
        let ranking = Ranking {
            iterations: 100000,
            timings: vec![
                Timing {
                    name: "subtract".to_string(),
                    elapsed: Duration::from_secs_f64(0.0116),
                },
                Timing {
                    name: "add".to_string(),
                    elapsed: Duration::from_secs_f64(0.0249),
                },
            ],
        };

        assert_eq!(
            ranking.report_lines(),
            vec![
                "subtract is fastest: 1.16e-2 seconds over 100000 iterations",
                "     add is slower : 2.49e-2 seconds over 100000 iterations",
            ]
        );
    }
}
