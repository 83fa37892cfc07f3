// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A minimal, zero-dependency, completely insecure PRNG. The schedulers take
/// one at construction so tests can inject a fixed seed and replay a session.
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    // Generate random number in range [0, max). max must be nonzero.
    pub fn generate(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(v: Vec<T>, rng: &mut TinyRng) -> Vec<T> {
    let mut v = v;
    for i in (1..v.len()).rev() {
        let j = rng.generate(i as u32 + 1) as usize;
        v.swap(i, j);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = TinyRng::from_seed(99);
        let mut b = TinyRng::from_seed(99);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_generate_in_range() {
        let mut rng = TinyRng::from_seed(7);
        for _ in 0..1000 {
            assert!(rng.generate(10) < 10);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = TinyRng::from_seed(3);
        let mut shuffled = shuffle((0..50).collect::<Vec<u32>>(), &mut rng);
        shuffled.sort_unstable();
        assert_eq!(shuffled, (0..50).collect::<Vec<u32>>());
    }
}
