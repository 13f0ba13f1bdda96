use crate::board::Board;
use crate::constants::{DEFAULT_GRID_SIZE, DEFAULT_SHUFFLE_STEPS, MIN_GRID_SIZE};
use crate::generator::{fold_move, generate_puzzle};
use crate::rng::{PickSource, Rng};
use crate::types::{MoveSource, SessionEvent, SessionPhase, SessionSnapshot};

#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    pub grid_size: usize,
    pub shuffle_steps: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            shuffle_steps: DEFAULT_SHUFFLE_STEPS,
        }
    }
}

impl SessionOptions {
    fn normalized(self) -> Self {
        Self {
            grid_size: self.grid_size.max(MIN_GRID_SIZE),
            shuffle_steps: self.shuffle_steps,
        }
    }
}

// Handed out by start_auto_solve; a reset or force-win bumps the session
// epoch so steps scheduled before it land as no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoSolveTicket {
    epoch: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoSolveStep {
    Applied { remaining: usize },
    Finished,
    Stale,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    options: SessionOptions,
    board: Board,
    solution: Vec<usize>,
    moves: u32,
    won: bool,
    auto_solving: bool,
    celebrated: bool,
    epoch: u64,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new(options: SessionOptions, seed: u32) -> Self {
        let mut rng = Rng::new(seed);
        Self::from_source(options, &mut rng)
    }

    pub fn from_source(options: SessionOptions, source: &mut dyn PickSource) -> Self {
        let options = options.normalized();
        let puzzle = generate_puzzle(options.grid_size, options.shuffle_steps, source);
        let mut session = Self {
            options,
            board: puzzle.board,
            solution: puzzle.solution,
            moves: 0,
            won: false,
            auto_solving: false,
            celebrated: false,
            epoch: 0,
            events: Vec::new(),
        };
        if session.board.is_solved() {
            // A fully cancelling shuffle is anticlimactic but legal.
            session.enter_solved(false);
        }
        session
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn solution(&self) -> &[usize] {
        &self.solution
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn is_auto_solving(&self) -> bool {
        self.auto_solving
    }

    pub fn phase(&self) -> SessionPhase {
        if self.won {
            SessionPhase::Solved
        } else if self.auto_solving {
            SessionPhase::AutoSolving
        } else {
            SessionPhase::Playing
        }
    }

    pub fn click_cell(&mut self, index: usize) {
        if self.won || self.auto_solving {
            return;
        }
        if !self.board.apply_move(index) {
            return;
        }
        self.moves += 1;
        fold_move(&mut self.solution, index);
        self.events.push(SessionEvent::CellToggled {
            index,
            by: MoveSource::Player,
        });
        if self.board.is_solved() {
            self.enter_solved(false);
        }
    }

    pub fn reset(&mut self, seed: u32) {
        let mut rng = Rng::new(seed);
        self.reset_from_source(&mut rng);
    }

    pub fn reset_from_source(&mut self, source: &mut dyn PickSource) {
        let puzzle = generate_puzzle(self.options.grid_size, self.options.shuffle_steps, source);
        self.board = puzzle.board;
        self.solution = puzzle.solution;
        self.moves = 0;
        self.won = false;
        self.auto_solving = false;
        self.celebrated = false;
        self.epoch += 1;
        self.events.clear();
        if self.board.is_solved() {
            self.enter_solved(false);
        }
    }

    pub fn start_auto_solve(&mut self) -> Option<AutoSolveTicket> {
        if self.won || self.auto_solving {
            return None;
        }
        self.auto_solving = true;
        self.events.push(SessionEvent::AutoSolveStarted {
            remaining: self.solution.len(),
        });
        Some(AutoSolveTicket { epoch: self.epoch })
    }

    pub fn auto_solve_step(&mut self, ticket: AutoSolveTicket) -> AutoSolveStep {
        if ticket.epoch != self.epoch || !self.auto_solving {
            return AutoSolveStep::Stale;
        }
        if self.solution.is_empty() {
            self.finish_auto_solve();
            return AutoSolveStep::Finished;
        }
        let index = self.solution.remove(0);
        self.board.apply_move(index);
        self.events.push(SessionEvent::CellToggled {
            index,
            by: MoveSource::Solver,
        });
        if self.solution.is_empty() {
            self.finish_auto_solve();
            return AutoSolveStep::Finished;
        }
        AutoSolveStep::Applied {
            remaining: self.solution.len(),
        }
    }

    pub fn force_win(&mut self) {
        self.epoch += 1;
        self.board.set_all_lit();
        self.solution.clear();
        self.enter_solved(true);
    }

    pub fn snapshot(&mut self, drain_events: bool) -> SessionSnapshot {
        let events = if drain_events {
            std::mem::take(&mut self.events)
        } else {
            self.events.clone()
        };
        SessionSnapshot {
            grid_size: self.board.size(),
            cells: self.board.cells().to_vec(),
            moves: self.moves,
            won: self.won,
            auto_solving: self.auto_solving,
            phase: self.phase(),
            solution: self.solution.clone(),
            events,
        }
    }

    fn finish_auto_solve(&mut self) {
        self.events.push(SessionEvent::AutoSolveFinished);
        self.enter_solved(false);
    }

    fn enter_solved(&mut self, forced: bool) {
        self.won = true;
        self.auto_solving = false;
        if !self.celebrated {
            self.celebrated = true;
            self.events.push(SessionEvent::PuzzleSolved {
                moves: self.moves,
                forced,
            });
        }
    }
}
