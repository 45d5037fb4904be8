//! Determinism checks for rendered output.
//!
//! A seeded render must produce the same bytes every time. [`verify_determinism`]
//! runs a render closure several times and reports the first differing byte.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the first run's output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// First difference found, if any.
    pub diff: Option<Difference>,
}

/// The first byte at which a run diverged from the first run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Byte offset, or the shorter length when only sizes differ.
    pub offset: usize,
    /// Which run (0-indexed) diverged.
    pub run_index: usize,
    /// Byte from the first run, if it has one at `offset`.
    pub expected: Option<u8>,
    /// Byte from the diverging run, if it has one at `offset`.
    pub actual: Option<u8>,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |b: Option<u8>| b.map_or("EOF".to_string(), |b| format!("0x{:02X}", b));
        write!(
            f,
            "difference at byte {}: expected {}, got {} (run {})",
            self.offset,
            byte(self.expected),
            byte(self.actual),
            self.run_index
        )
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff {
            panic!(
                "Non-deterministic output detected!\n\
                 Runs: {}\n\
                 Output size: {} bytes\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Runs `render` `runs` times (at least two) and compares every output to
/// the first.
pub fn verify_determinism<F>(mut render: F, runs: usize) -> DeterminismResult
where
    F: FnMut() -> Vec<u8>,
{
    let runs = runs.max(2);
    let first = render();
    let hash = blake3::hash(&first).to_hex().to_string();

    for run_index in 1..runs {
        let output = render();
        if let Some(offset) = first_difference(&first, &output) {
            return DeterminismResult {
                is_deterministic: false,
                runs: run_index + 1,
                output_size: first.len(),
                hash,
                diff: Some(Difference {
                    offset,
                    run_index,
                    expected: first.get(offset).copied(),
                    actual: output.get(offset).copied(),
                }),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        output_size: first.len(),
        hash,
        diff: None,
    }
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_runs() {
        let result = verify_determinism(|| vec![1, 2, 3], 3);
        assert!(result.is_deterministic);
        assert_eq!(result.runs, 3);
        result.assert_deterministic();
    }

    #[test]
    fn test_detects_changed_byte() {
        let mut counter = 0u8;
        let result = verify_determinism(
            || {
                counter += 1;
                vec![0, counter]
            },
            3,
        );
        assert!(!result.is_deterministic);
        assert_eq!(
            result.diff,
            Some(Difference {
                offset: 1,
                run_index: 1,
                expected: Some(1),
                actual: Some(2),
            })
        );
    }

    #[test]
    fn test_detects_length_change() {
        let mut len = 0;
        let result = verify_determinism(
            || {
                len += 1;
                vec![7; len]
            },
            2,
        );
        assert_eq!(result.diff.map(|d| d.offset), Some(1));
    }
}
