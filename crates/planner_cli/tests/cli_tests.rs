//! Command-line round trips: parse, solve, print.

use clap::Parser;
use std::io::Write;

use planner_cli::cli::{run, Cli};
use planner_cli::error::CliError;
use planner_core::data::PlannerConfig;
use planner_core::problem::EconomyModel;

fn run_args(args: &[&str]) -> Result<String, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("build-planner").chain(args.iter().copied()))
        .unwrap();
    run(&cli.command)
}

const MINIMAL: [&str; 7] = [
    "solve",
    "--model",
    "generators",
    "--lc-target",
    "3",
    "--qp-target",
    "1",
];

#[test]
fn test_solve_prints_one_line_per_step() {
    let output = run_args(&MINIMAL).unwrap();
    assert_eq!(output, "[0m 14s 16t] Build QP generator LC: 4 QP: 40\n");
}

#[test]
fn test_every_strategy_prints_the_same_finish_time() {
    for strategy in ["astar", "ida", "dfbb"] {
        let mut args = MINIMAL.to_vec();
        args.extend(["--strategy", strategy, "--heuristic", "zero"]);
        let output = run_args(&args).unwrap();
        let last = output.lines().last().unwrap();
        assert!(last.starts_with("[0m 14s 16t]"), "{strategy}: {last}");
    }
}

#[test]
fn test_solve_json_report() {
    let mut args = MINIMAL.to_vec();
    args.extend(["--format", "json"]);
    let output = run_args(&args).unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["total_ticks"], 268);
    assert_eq!(report["ticks_per_second"], 18);
    assert_eq!(report["steps"][0]["label"], "Build QP generator");
    assert_eq!(report["steps"][0]["elapsed"], 268);
    assert!(report["stats"]["expanded"].as_u64().unwrap() >= 1);
}

#[test]
fn test_show_config_round_trips() {
    let output = run_args(&["show-config", "--model", "generators", "--qp-target", "2"]).unwrap();
    let config = PlannerConfig::from_ron_str(&output).unwrap();
    assert_eq!(
        config.model,
        EconomyModel::Generators {
            lc_target: 4,
            qp_target: 2
        }
    );
}

#[test]
fn test_config_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        run_args(&["show-config", "--model", "generators", "--lc-target", "3"]).unwrap()
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_owned();

    let output = run_args(&["solve", "--config", &path]).unwrap();
    assert!(output.ends_with("Build QP generator LC: 4 QP: 40\n"));
}

#[test]
fn test_invalid_goal_is_reported() {
    // More pulsers than one depot can house.
    let result = run_args(&["solve", "--pulsers", "9"]);
    assert!(matches!(result, Err(CliError::Planner(_))));
}

#[test]
fn test_missing_config_file() {
    let result = run_args(&["solve", "--config", "/nonexistent/planner.ron"]);
    assert!(matches!(result, Err(CliError::FileNotFound(_))));
}
