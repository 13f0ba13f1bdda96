use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Playing,
    AutoSolving,
    Solved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSource {
    Player,
    Solver,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    CellToggled {
        index: usize,
        by: MoveSource,
    },
    AutoSolveStarted {
        remaining: usize,
    },
    AutoSolveFinished,
    // One-shot celebration trigger for the presentation layer.
    PuzzleSolved {
        moves: u32,
        forced: bool,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    #[serde(rename = "gridSize")]
    pub grid_size: usize,
    pub cells: Vec<bool>,
    pub moves: u32,
    pub won: bool,
    #[serde(rename = "autoSolving")]
    pub auto_solving: bool,
    pub phase: SessionPhase,
    pub solution: Vec<usize>,
    pub events: Vec<SessionEvent>,
}

impl SessionSnapshot {
    pub fn is_on_solution_path(&self, index: usize) -> bool {
        self.solution.contains(&index)
    }
}
