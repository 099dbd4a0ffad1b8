use std::fmt;

const MAX_DEPTH: usize = 256;

/// Depth gathers minimum, maximum, mean and percentiles of the path
/// lengths from a root to each absent child, across one or more trees.
#[derive(Clone)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    depths: [u64; MAX_DEPTH],
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        let depth = depth.min(MAX_DEPTH - 1);
        if self.samples == 0 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
        self.samples += 1;
        self.total += depth;
        self.depths[depth] += 1;
    }

    /// Return number of leaf positions sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Return the shortest sampled path.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Return the longest sampled path.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average path length, 0 when nothing was sampled.
    pub fn mean(&self) -> usize {
        self.total.checked_div(self.samples).unwrap_or(0)
    }

    /// Return (percentile, depth) pairs for percentiles from 90 up,
    /// each pair marking the depth at which that share of leaves is
    /// covered.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut out = vec![];
        if self.samples == 0 {
            return out;
        }
        let (mut acc, mut floor) = (0_u64, 90_u8);
        for (depth, &n) in self.depths.iter().enumerate().filter(|(_, n)| **n > 0) {
            acc += n;
            let perc = ((acc * 100) / self.samples as u64) as u8;
            if perc >= floor {
                out.push((perc, depth));
                floor = perc;
            }
        }
        out
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth {
            samples: 0,
            min: 0,
            max: 0,
            total: 0,
            depths: [0; MAX_DEPTH],
        }
    }
}

impl fmt::Debug for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Depth")
            .field("samples", &self.samples)
            .field("min", &self.min)
            .field("mean", &self.mean())
            .field("max", &self.max)
            .finish()
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth (min, mean, max): ({}, {}, {})", self.min, self.mean(), self.max)?;
        for (perc, depth) in self.percentiles() {
            write!(f, "\n  {} percentile = {}", perc, depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_samples() {
        let mut depth = Depth::new();
        assert_eq!(depth.mean(), 0);
        assert!(depth.percentiles().is_empty());

        for d in [2, 3, 3, 4].iter() {
            depth.sample(*d);
        }
        assert_eq!(depth.samples(), 4);
        assert_eq!(depth.min(), 2);
        assert_eq!(depth.max(), 4);
        assert_eq!(depth.mean(), 3);
        assert_eq!(depth.percentiles(), vec![(100, 4)]);
    }
}
