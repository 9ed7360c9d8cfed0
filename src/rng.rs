use rand::RngCore;

/// Mulberry32 stream with 32-bit wrapping state.
///
/// Scenario generation must be reproducible from a single u32 seed across
/// ports, so the state is never widened and the mixing constants are fixed.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform draw in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / 4294967296.0
    }

    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform integer, inclusive on both ends.
    pub fn randint(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * ((hi - lo + 1) as f64)) as i64
    }

    /// Panics if `seq` is empty.
    pub fn choice<'a, T>(&mut self, seq: &'a [T]) -> &'a T {
        assert!(!seq.is_empty(), "choice from an empty sequence");
        &seq[(self.next_f64() * seq.len() as f64) as usize]
    }

    /// Fisher-Yates over a copy, walking the index down from the end.
    pub fn shuffle<T: Clone>(&mut self, seq: &[T]) -> Vec<T> {
        let mut out = seq.to_vec();
        for i in (1..out.len()).rev() {
            let j = (self.next_f64() * (i + 1) as f64) as usize;
            out.swap(i, j);
        }
        out
    }

    pub fn sample<T: Clone>(&mut self, seq: &[T], n: usize) -> Vec<T> {
        let mut out = self.shuffle(seq);
        out.truncate(n);
        out
    }

    /// Draws an index with probability proportional to its weight.
    ///
    /// Non-positive weights cannot be drawn. Returns `None` when the total
    /// weight is not positive. Ties at a cumulative boundary resolve to the
    /// lower index; the last index catches any rounding shortfall.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let r = self.next_f64() * total;
        let mut cum = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            if w > 0.0 {
                cum += w;
            }
            if cum >= r {
                return Some(i);
            }
        }
        Some(weights.len() - 1)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }
    fn next_u64(&mut self) -> u64 {
        let lo = self.step() as u64;
        let hi = self.step() as u64;
        (hi << 32) | lo
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Mulberry32::new(0xDEC0);
        let mut b = a.clone();
        for _ in 0..100 {
            assert_eq!(a.step(), b.step());
        }
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Mulberry32::new(12345);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
            let u = rng.uniform(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&u));
        }
    }

    #[test]
    fn randint_is_inclusive_and_bounded() {
        let mut rng = Mulberry32::new(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let v = rng.randint(2, 5);
            assert!((2..=5).contains(&v));
            seen[(v - 2) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "all values in range should appear");
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Mulberry32::new(99);
        let orig: Vec<i32> = (0..20).collect();
        let mut shuffled = rng.shuffle(&orig);
        shuffled.sort();
        assert_eq!(shuffled, orig);
    }

    #[test]
    fn sample_takes_a_shuffle_prefix() {
        let mut a = Mulberry32::new(4);
        let mut b = Mulberry32::new(4);
        let orig: Vec<i32> = (0..10).collect();
        assert_eq!(a.sample(&orig, 3), b.shuffle(&orig)[..3]);
    }

    #[test]
    fn weighted_index_edge_cases() {
        let mut rng = Mulberry32::new(1);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, -1.0]), None);
        assert_eq!(rng.weighted_index(&[0.0, 3.5, 0.0]), Some(1));
        for _ in 0..50 {
            let idx = rng.weighted_index(&[1.0, 0.0, 2.0]).unwrap();
            assert_ne!(idx, 1, "zero-weight index must not be drawn");
        }
    }

    #[test]
    #[should_panic(expected = "empty sequence")]
    fn choice_rejects_empty() {
        let empty: [u8; 0] = [];
        Mulberry32::new(0).choice(&empty);
    }

    #[test]
    fn plugs_into_the_rand_ecosystem() {
        use rand::prelude::IteratorRandom;
        let mut rng = Mulberry32::new(2024);
        let face = (1..=6).choose(&mut rng);
        assert!(matches!(face, Some(1..=6)));
    }
}
