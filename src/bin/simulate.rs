use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use lights_out_engine::constants::{DEFAULT_GRID_SIZE, DEFAULT_SHUFFLE_STEPS};
use lights_out_engine::rng::{PickSource, Rng};
use lights_out_engine::session::{AutoSolveStep, GameSession, SessionOptions};
use lights_out_engine::types::SessionEvent;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 100)]
    seeds: u32,
    #[arg(long, default_value_t = 0)]
    seed_start: u32,
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,
    #[arg(long, default_value_t = DEFAULT_SHUFFLE_STEPS)]
    shuffle_steps: usize,
    #[arg(long, default_value_t = 40)]
    fuzz_clicks: u32,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    #[serde(rename = "gridSize")]
    grid_size: usize,
    #[serde(rename = "shuffleSteps")]
    shuffle_steps: usize,
    #[serde(rename = "pathLen")]
    path_len: usize,
    #[serde(rename = "movesToSolve")]
    moves_to_solve: u32,
    #[serde(rename = "fuzzClicks")]
    fuzz_clicks: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    seed: u32,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageMovesToSolve")]
    average_moves_to_solve: u32,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    timestamp: String,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn default_match_id(seed_start: u32, now_ms: u64) -> String {
    format!("sim-{seed_start}-{now_ms}")
}

fn log_line(level: &str, event: &str, match_id: &str, scenario: Option<String>, detail: Option<Value>) {
    let line = StructuredLogLine {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        scenario,
        detail,
    };
    println!(
        "{}",
        serde_json::to_string(&line).expect("log line should serialize")
    );
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    records: &mut Vec<AnomalyRecord>,
    seen: &mut HashSet<String>,
    seed: u32,
    message: String,
) {
    records.push(AnomalyRecord {
        seed,
        message: message.clone(),
    });
    if seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn solution_replay_solves(session: &GameSession) -> bool {
    let mut board = session.board().clone();
    for &index in session.solution() {
        board.apply_move(index);
    }
    board.is_solved()
}

fn drained_solved_event_count(session: &mut GameSession) -> usize {
    session
        .snapshot(true)
        .events
        .iter()
        .filter(|event| matches!(event, SessionEvent::PuzzleSolved { .. }))
        .count()
}

fn run_scenario(
    seed: u32,
    options: SessionOptions,
    fuzz_clicks: u32,
    records: &mut Vec<AnomalyRecord>,
) -> ScenarioResultLine {
    let mut anomalies = Vec::new();
    let mut seen = HashSet::new();

    // 1. Replaying the canonical path as user clicks must solve the board.
    let mut session = GameSession::new(options, seed);
    let path_len = session.solution().len();
    if !solution_replay_solves(&session) {
        push_anomaly(
            &mut anomalies,
            records,
            &mut seen,
            seed,
            "generated solution does not replay to solved".to_string(),
        );
    }
    for index in session.solution().to_vec() {
        session.click_cell(index);
    }
    let moves_to_solve = session.moves();
    if !session.won() && path_len > 0 {
        push_anomaly(
            &mut anomalies,
            records,
            &mut seen,
            seed,
            "replaying full path did not win".to_string(),
        );
    }
    if moves_to_solve as usize != path_len {
        push_anomaly(
            &mut anomalies,
            records,
            &mut seen,
            seed,
            "move counter does not match replayed path length".to_string(),
        );
    }
    let expected_celebrations = usize::from(session.won());
    if drained_solved_event_count(&mut session) != expected_celebrations {
        push_anomaly(
            &mut anomalies,
            records,
            &mut seen,
            seed,
            "celebration event count wrong after replay".to_string(),
        );
    }

    // 2. Auto-solve drain with input guards.
    let mut session = GameSession::new(options, seed);
    if !session.won() {
        let Some(ticket) = session.start_auto_solve() else {
            push_anomaly(
                &mut anomalies,
                records,
                &mut seen,
                seed,
                "auto-solve rejected on a playing session".to_string(),
            );
            return finish_scenario(seed, options, path_len, moves_to_solve, fuzz_clicks, anomalies);
        };
        let board = session.board().clone();
        session.click_cell(0);
        if session.board() != &board || session.moves() != 0 {
            push_anomaly(
                &mut anomalies,
                records,
                &mut seen,
                seed,
                "click during auto-solve mutated the session".to_string(),
            );
        }
        if session.start_auto_solve().is_some() {
            push_anomaly(
                &mut anomalies,
                records,
                &mut seen,
                seed,
                "re-entrant auto-solve was accepted".to_string(),
            );
        }
        let mut steps = 0usize;
        loop {
            match session.auto_solve_step(ticket) {
                AutoSolveStep::Applied { .. } => steps += 1,
                AutoSolveStep::Finished => break,
                AutoSolveStep::Stale => {
                    push_anomaly(
                        &mut anomalies,
                        records,
                        &mut seen,
                        seed,
                        "auto-solve went stale without a reset".to_string(),
                    );
                    break;
                }
            }
            if steps > path_len {
                push_anomaly(
                    &mut anomalies,
                    records,
                    &mut seen,
                    seed,
                    "auto-solve ran past the solution path".to_string(),
                );
                break;
            }
        }
        if !session.won() || session.is_auto_solving() || !session.solution().is_empty() {
            push_anomaly(
                &mut anomalies,
                records,
                &mut seen,
                seed,
                "auto-solve did not end in a clean solved state".to_string(),
            );
        }
        if session.moves() != 0 {
            push_anomaly(
                &mut anomalies,
                records,
                &mut seen,
                seed,
                "auto-solve incremented the user move counter".to_string(),
            );
        }
    }

    // 3. Random clicks keep the solution-path invariant, then force-win.
    let mut session = GameSession::new(options, seed);
    let mut fuzz_rng = Rng::new(seed ^ 0x9e37_79b9);
    for _ in 0..fuzz_clicks {
        if session.won() {
            break;
        }
        let index = fuzz_rng.pick_cell(session.board().cell_count());
        session.click_cell(index);
        if !solution_replay_solves(&session) {
            push_anomaly(
                &mut anomalies,
                records,
                &mut seen,
                seed,
                "solution path lost sync with the board during fuzz".to_string(),
            );
            break;
        }
    }
    session.force_win();
    if !session.board().is_solved() || !session.won() || !session.solution().is_empty() {
        push_anomaly(
            &mut anomalies,
            records,
            &mut seen,
            seed,
            "force-win left a partially lit session".to_string(),
        );
    }

    finish_scenario(seed, options, path_len, moves_to_solve, fuzz_clicks, anomalies)
}

fn finish_scenario(
    seed: u32,
    options: SessionOptions,
    path_len: usize,
    moves_to_solve: u32,
    fuzz_clicks: u32,
    anomalies: Vec<String>,
) -> ScenarioResultLine {
    ScenarioResultLine {
        scenario: format!("seed-{seed}"),
        seed,
        grid_size: options.grid_size,
        shuffle_steps: options.shuffle_steps,
        path_len,
        moves_to_solve,
        fuzz_clicks,
        anomalies,
    }
}

fn build_run_summary(
    match_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let total_moves: u64 = scenarios
        .iter()
        .map(|scenario| scenario.moves_to_solve as u64)
        .sum();
    let average_moves_to_solve = if scenario_count == 0 {
        0
    } else {
        (total_moves / scenario_count as u64) as u32
    };
    let mut outcome_counts = BTreeMap::new();
    for scenario in &scenarios {
        let outcome = if scenario.anomalies.is_empty() {
            "clean"
        } else {
            "anomalous"
        };
        *outcome_counts.entry(outcome.to_string()).or_insert(0) += 1;
    }
    RunSummary {
        match_id,
        started_at_ms,
        finished_at_ms,
        scenario_count,
        anomaly_count,
        average_moves_to_solve,
        outcome_counts,
        scenarios,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}

fn main() {
    let cli = Cli::parse();
    let started_at_ms = now_ms();
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(cli.seed_start, started_at_ms));
    let options = SessionOptions {
        grid_size: cli.size,
        shuffle_steps: cli.shuffle_steps,
    };

    log_line(
        "info",
        "run_started",
        &match_id,
        None,
        Some(json!({
            "seeds": cli.seeds,
            "seedStart": cli.seed_start,
            "gridSize": options.grid_size,
            "shuffleSteps": options.shuffle_steps,
            "fuzzClicks": cli.fuzz_clicks,
        })),
    );

    let mut scenarios = Vec::new();
    let mut records = Vec::new();
    for offset in 0..cli.seeds {
        let seed = cli.seed_start.wrapping_add(offset);
        let result = run_scenario(seed, options, cli.fuzz_clicks, &mut records);
        if result.anomalies.is_empty() {
            log_line(
                "info",
                "scenario_finished",
                &match_id,
                Some(result.scenario.clone()),
                Some(json!({
                    "pathLen": result.path_len,
                    "movesToSolve": result.moves_to_solve,
                })),
            );
        } else {
            log_line(
                "error",
                "scenario_anomalies",
                &match_id,
                Some(result.scenario.clone()),
                Some(json!({ "anomalies": result.anomalies })),
            );
        }
        scenarios.push(result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        started_at_ms,
        now_ms(),
        scenarios,
        records.len(),
    );
    log_line(
        "info",
        "run_finished",
        &match_id,
        None,
        Some(json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageMovesToSolve": summary.average_moves_to_solve,
        })),
    );

    if let Some(path) = &cli.summary_out {
        match write_summary(path, &summary) {
            Ok(()) => log_line(
                "info",
                "summary_written",
                &match_id,
                None,
                Some(json!({ "path": path.display().to_string() })),
            ),
            Err(error) => {
                log_line(
                    "error",
                    "summary_write_failed",
                    &match_id,
                    None,
                    Some(json!({ "error": error.to_string() })),
                );
                std::process::exit(1);
            }
        }
    }

    if summary.anomaly_count > 0 {
        std::process::exit(1);
    }
}
