// Reference multiset over the dense key domain `0..capacity`, used to
// cross-check tree behaviour under random operation sequences.
struct RefCounts {
    counts: Vec<usize>,
}

impl RefCounts {
    fn new(capacity: usize) -> RefCounts {
        RefCounts {
            counts: vec![0; capacity],
        }
    }

    fn insert(&mut self, key: i64) -> usize {
        self.counts[key as usize] += 1;
        self.counts[key as usize]
    }

    // true when an occurrence was taken away.
    fn delete(&mut self, key: i64) -> bool {
        match self.counts[key as usize] {
            0 => false,
            _ => {
                self.counts[key as usize] -= 1;
                true
            }
        }
    }

    fn remove(&mut self, key: i64) -> Option<usize> {
        match std::mem::replace(&mut self.counts[key as usize], 0) {
            0 => None,
            n => Some(n),
        }
    }

    fn multiplicity(&self, key: i64) -> usize {
        self.counts[key as usize]
    }

    fn len(&self) -> usize {
        self.counts.iter().filter(|n| **n > 0).count()
    }

    fn keys(&self) -> Vec<i64> {
        (0..self.counts.len() as i64)
            .filter(|k| self.counts[*k as usize] > 0)
            .collect()
    }

    fn predecessor(&self, key: i64) -> Option<i64> {
        if self.multiplicity(key) == 0 {
            return None;
        }
        (0..key).rev().find(|k| self.counts[*k as usize] > 0)
    }

    fn successor(&self, key: i64) -> Option<i64> {
        if self.multiplicity(key) == 0 {
            return None;
        }
        (key + 1..self.counts.len() as i64).find(|k| self.counts[*k as usize] > 0)
    }
}

fn make_seed() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn make_rng() -> SmallRng {
    let seed = make_seed();
    println!("seed {}", seed);
    SmallRng::from_seed(seed.to_le_bytes())
}
