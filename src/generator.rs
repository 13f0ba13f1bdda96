use crate::board::Board;
use crate::rng::PickSource;

#[derive(Clone, Debug)]
pub struct GeneratedPuzzle {
    pub board: Board,
    pub solution: Vec<usize>,
}

// Folds one move into a canonical path: a repeated index cancels the earlier
// occurrence, anything else is appended. Toggle moves commute and are their
// own inverse, so the folded path replayed in order undoes the whole prefix.
pub fn fold_move(path: &mut Vec<usize>, index: usize) {
    if let Some(position) = path.iter().position(|&m| m == index) {
        path.remove(position);
    } else {
        path.push(index);
    }
}

pub fn generate_puzzle(
    size: usize,
    shuffle_steps: usize,
    source: &mut dyn PickSource,
) -> GeneratedPuzzle {
    let mut board = Board::new_solved(size);
    let mut solution = Vec::new();
    let mut previous: Option<usize> = None;

    for _ in 0..shuffle_steps {
        let mut pick = source.pick_cell(board.cell_count());
        while board.cell_count() > 1 && Some(pick) == previous {
            pick = source.pick_cell(board.cell_count());
        }
        board.apply_move(pick);
        fold_move(&mut solution, pick);
        previous = Some(pick);
    }

    GeneratedPuzzle { board, solution }
}
