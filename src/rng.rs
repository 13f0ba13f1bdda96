pub trait PickSource {
    fn pick_cell(&mut self, cell_count: usize) -> usize;
}

#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }
}

impl PickSource for Rng {
    fn pick_cell(&mut self, cell_count: usize) -> usize {
        if cell_count <= 1 {
            return 0;
        }
        (self.next_f32() * cell_count as f32)
            .floor()
            .min((cell_count - 1) as f32) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{PickSource, Rng};

    #[test]
    fn same_seed_produces_same_pick_stream() {
        let mut a = Rng::new(424_242);
        let mut b = Rng::new(424_242);
        for _ in 0..1_000 {
            assert_eq!(a.pick_cell(25), b.pick_cell(25));
        }
    }

    #[test]
    fn picks_stay_in_range() {
        let mut rng = Rng::new(7);
        for _ in 0..10_000 {
            assert!(rng.pick_cell(25) < 25);
        }
        assert_eq!(rng.pick_cell(0), 0);
        assert_eq!(rng.pick_cell(1), 0);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        let picks_a: Vec<usize> = (0..32).map(|_| a.pick_cell(25)).collect();
        let picks_b: Vec<usize> = (0..32).map(|_| b.pick_cell(25)).collect();
        assert_ne!(picks_a, picks_b);
    }
}
