//! Run the scripted scenario catalog against the reference engine.

use clump_oracle::scenarios::{mode_check_options, run_label_scenarios, run_mode_checks};
use clump_oracle::{BruteForce, ComputeOracle, Dataset, OracleConfig, QualityOutcome, Table, TARGET};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env("CLUMP_ORACLE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("{TARGET}=info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = OracleConfig::default().with_env_overrides();
    let oracle = ComputeOracle::new(BruteForce).with_config(config);

    println!("=== Scripted label scenarios ===");
    for (name, outcome) in run_label_scenarios(&oracle) {
        match outcome {
            Ok(v) => println!("  PASS {name:<24} ({} rows)", v.outcome.rows),
            Err(e) => println!("  FAIL {name:<24} {e}"),
        }
    }

    println!("\n=== Result option masks ===");
    match run_mode_checks(&oracle, mode_check_options()) {
        Ok(verdicts) => {
            for v in verdicts {
                println!("  PASS {}", v.outcome.options);
            }
        }
        Err(e) => println!("  FAIL {e}"),
    }

    println!("\n=== Quality score ===");
    let data = Table::from_rows(&[
        [0.0, 0.0],
        [0.1, 0.2],
        [0.2, 0.1],
        [5.0, 5.0],
        [5.1, 4.9],
        [4.9, 5.1],
        [10.0, 0.0],
        [10.1, 0.1],
        [9.9, -0.1],
    ])
    .expect("rows have equal length");
    let dataset = Dataset::new("three blobs", &data);
    match oracle.check_quality(dataset, 1.0, 2, 0.03, Some(0.1)) {
        Ok(v) => match v.outcome {
            QualityOutcome::Compared { cluster_count, check } => println!(
                "  PASS {cluster_count} clusters, index {:.5} (reference {:.5})",
                check.value, check.reference
            ),
            QualityOutcome::Skipped { cluster_count } => {
                println!("  SKIP {cluster_count} clusters")
            }
            QualityOutcome::NoReference { precision } => {
                println!("  SKIP no {precision} reference")
            }
        },
        Err(e) => println!("  FAIL {e}"),
    }
}
