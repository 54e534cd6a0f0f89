//! Chronological train/test partition.
//!
//! The most recent rows form the test set; rows are never shuffled, so no
//! test row predates a training row.

use std::ops::Range;

/// Row ranges of a chronological split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndex {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Split `len` rows, holding out `ceil(len * test_percent / 100)` latest rows.
///
/// `test_percent` above 100 is treated as 100.
pub fn chronological_split(len: usize, test_percent: u32) -> SplitIndex {
    let pct = test_percent.min(100) as usize;
    let n_test = (len * pct).div_ceil(100);
    let n_train = len - n_test;
    SplitIndex {
        train: 0..n_train,
        test: n_train..len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighty_twenty_of_hundred() {
        let s = chronological_split(100, 20);
        assert_eq!(s.train, 0..80);
        assert_eq!(s.test, 80..100);
    }

    #[test]
    fn test_side_rounds_up() {
        // 0.2 * 11 = 2.2 -> 3 test rows, 8 train rows.
        let s = chronological_split(11, 20);
        assert_eq!(s.train, 0..8);
        assert_eq!(s.test, 8..11);
    }

    #[test]
    fn tiny_inputs() {
        assert_eq!(chronological_split(0, 20).test, 0..0);
        let one = chronological_split(1, 20);
        assert!(one.train.is_empty());
        assert_eq!(one.test, 0..1);
    }

    #[test]
    fn ranges_cover_every_row_once() {
        for len in 0..50 {
            let s = chronological_split(len, 20);
            assert_eq!(s.train.end, s.test.start);
            assert_eq!(s.test.end, len);
        }
    }
}
