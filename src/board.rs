#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<bool>,
}

impl Board {
    pub fn new_solved(size: usize) -> Self {
        Self {
            size,
            cells: vec![true; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_lit(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|&cell| cell)
    }

    pub fn set_all_lit(&mut self) {
        self.cells.fill(true);
    }

    // Toggles the target cell and every in-bounds orthogonal neighbor.
    // Out-of-bounds indices are ignored and leave the board untouched.
    pub fn apply_move(&mut self, index: usize) -> bool {
        if index >= self.cells.len() {
            return false;
        }
        let row = index / self.size;
        let col = index % self.size;
        self.cells[index] = !self.cells[index];
        if row > 0 {
            self.cells[index - self.size] = !self.cells[index - self.size];
        }
        if row < self.size - 1 {
            self.cells[index + self.size] = !self.cells[index + self.size];
        }
        if col > 0 {
            self.cells[index - 1] = !self.cells[index - 1];
        }
        if col < self.size - 1 {
            self.cells[index + 1] = !self.cells[index + 1];
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Board;

    #[test]
    fn solved_board_has_all_cells_lit() {
        let board = Board::new_solved(5);
        assert_eq!(board.cell_count(), 25);
        assert_eq!(board.lit_count(), 25);
        assert!(board.is_solved());
    }

    #[test]
    fn center_move_toggles_five_cells() {
        let mut board = Board::new_solved(5);
        assert!(board.apply_move(12));
        assert_eq!(board.lit_count(), 20);
        for index in [12, 7, 17, 11, 13] {
            assert!(!board.is_lit(index));
        }
        assert!(!board.is_solved());
    }

    #[test]
    fn corner_move_toggles_three_cells() {
        let mut board = Board::new_solved(5);
        assert!(board.apply_move(0));
        assert_eq!(board.lit_count(), 22);
        for index in [0, 1, 5] {
            assert!(!board.is_lit(index));
        }
        assert!(board.is_lit(6));

        let mut board = Board::new_solved(5);
        assert!(board.apply_move(24));
        assert_eq!(board.lit_count(), 22);
        for index in [24, 23, 19] {
            assert!(!board.is_lit(index));
        }
    }

    #[test]
    fn edge_move_toggles_four_cells() {
        let mut board = Board::new_solved(5);
        assert!(board.apply_move(2));
        assert_eq!(board.lit_count(), 21);
        for index in [2, 1, 3, 7] {
            assert!(!board.is_lit(index));
        }
    }

    #[test]
    fn moves_are_involutions() {
        let mut board = Board::new_solved(5);
        for index in 0..board.cell_count() {
            let before = board.clone();
            board.apply_move(index);
            assert_ne!(board, before);
            board.apply_move(index);
            assert_eq!(board, before);
        }
    }

    #[test]
    fn moves_commute() {
        let mut forward = Board::new_solved(5);
        let mut backward = Board::new_solved(5);
        let sequence = [3usize, 7, 12, 20, 1, 9, 24, 0];
        for &index in &sequence {
            forward.apply_move(index);
        }
        for &index in sequence.iter().rev() {
            backward.apply_move(index);
        }
        assert_eq!(forward, backward);
    }

    #[test]
    fn out_of_bounds_move_is_a_no_op() {
        let mut board = Board::new_solved(5);
        let before = board.clone();
        assert!(!board.apply_move(25));
        assert!(!board.apply_move(usize::MAX));
        assert_eq!(board, before);
    }

    #[test]
    fn smallest_board_stays_in_bounds() {
        let mut board = Board::new_solved(2);
        assert!(board.apply_move(0));
        assert_eq!(board.lit_count(), 1);
        assert!(board.is_lit(3));
    }
}
