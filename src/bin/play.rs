use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lights_out_engine::auto_solve::{drive_auto_solve, SharedSession};
use lights_out_engine::constants::{AUTO_SOLVE_STEP_MS, DEFAULT_GRID_SIZE, DEFAULT_SHUFFLE_STEPS};
use lights_out_engine::session::{GameSession, SessionOptions};
use lights_out_engine::types::{SessionEvent, SessionSnapshot};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,
    #[arg(long, default_value_t = DEFAULT_SHUFFLE_STEPS)]
    shuffle_steps: usize,
    #[arg(long)]
    seed: Option<u32>,
}

fn render(snapshot: &SessionSnapshot) {
    println!();
    for row in 0..snapshot.grid_size {
        let mut line = String::new();
        for col in 0..snapshot.grid_size {
            let index = row * snapshot.grid_size + col;
            line.push(if snapshot.cells[index] { '#' } else { '.' });
            line.push(' ');
        }
        println!("  {line}");
    }
    let status = if snapshot.won {
        "SYSTEM ONLINE"
    } else {
        "PARTIAL POWER"
    };
    println!("  {} moves | {status}", snapshot.moves);
    if !snapshot.solution.is_empty() {
        println!("  remaining path: {:?}", snapshot.solution);
    }
    for event in &snapshot.events {
        if let SessionEvent::PuzzleSolved { moves, forced } = event {
            if *forced {
                println!("  * solved by override *");
            } else {
                println!("  * solved in {moves} moves *");
            }
        }
    }
}

fn read_command() -> Option<String> {
    print!("\ncell index, (s)olve, (r)eset, (w)in, (q)uit> ");
    io::stdout().flush().ok()?;
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input.trim().to_string()),
        Err(_) => None,
    }
}

async fn run_auto_solve(session: &SharedSession) {
    let driver = tokio::spawn(drive_auto_solve(Arc::clone(session)));
    while !driver.is_finished() {
        tokio::time::sleep(Duration::from_millis(AUTO_SOLVE_STEP_MS)).await;
        let snapshot = session.lock().await.snapshot(true);
        render(&snapshot);
    }
    if driver.await.unwrap_or(false) {
        render(&session.lock().await.snapshot(true));
    } else {
        println!("  auto-solve unavailable");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random::<u32>);
    let options = SessionOptions {
        grid_size: cli.size,
        shuffle_steps: cli.shuffle_steps,
    };
    let session: SharedSession = Arc::new(Mutex::new(GameSession::new(options, seed)));

    println!("lights-out (seed {seed}) - light every node");
    render(&session.lock().await.snapshot(true));

    loop {
        let Some(command) = read_command() else {
            break;
        };
        match command.as_str() {
            "" => continue,
            "q" | "quit" => break,
            "s" | "solve" => {
                run_auto_solve(&session).await;
                continue;
            }
            "r" | "reset" => {
                let seed = rand::random::<u32>();
                session.lock().await.reset(seed);
                println!("  new puzzle (seed {seed})");
            }
            "w" | "win" => {
                session.lock().await.force_win();
            }
            other => match other.parse::<usize>() {
                Ok(index) => {
                    let mut session = session.lock().await;
                    if index >= session.board().cell_count() {
                        println!("  cell must be 0-{}", session.board().cell_count() - 1);
                        continue;
                    }
                    session.click_cell(index);
                }
                Err(_) => {
                    println!("  enter a cell index or s/r/w/q");
                    continue;
                }
            },
        }
        render(&session.lock().await.snapshot(true));
    }
}
