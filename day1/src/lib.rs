use itertools::Itertools;
use thiserror::Error;
use tracing::debug;
use util::{lines_of, parse_nice, parse_number, InputError};

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Unable to parse depth measurements")]
    Input(#[from] InputError),

    #[error("Window size must be at least 1")]
    EmptyWindow,
}

pub fn parse_depths(input: &str) -> Result<Vec<u64>, SweepError> {
    Ok(parse_nice(input, lines_of(parse_number))?)
}

pub fn count_increases(depths: &[u64]) -> usize {
    depths
        .iter()
        .tuple_windows()
        .filter(|(prev, next)| next > prev)
        .count()
}

/// Compares sums of consecutive sliding windows instead of single measurements.
pub fn count_window_increases(depths: &[u64], window: usize) -> Result<usize, SweepError> {
    if window == 0 {
        return Err(SweepError::EmptyWindow);
    }

    let sums = depths
        .windows(window)
        .map(|w| w.iter().sum())
        .collect::<Vec<u64>>();
    debug!(window, sums = sums.len(), "summed sliding windows");

    Ok(count_increases(&sums))
}

pub fn get_num_increases(input: &str) -> Result<usize, SweepError> {
    Ok(count_increases(&parse_depths(input)?))
}

pub fn get_num_window_increases(input: &str) -> Result<usize, SweepError> {
    count_window_increases(&parse_depths(input)?, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let res = get_num_increases(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 7);
    }

    #[test]
    fn part2() {
        let res = get_num_window_increases(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 5);
    }

    #[rstest]
    #[case(vec![], 1, 0)]
    #[case(vec![5], 1, 0)]
    #[case(vec![3, 3, 3], 1, 0)]
    #[case(vec![1, 2, 3], 1, 2)]
    #[case(vec![1, 2, 3], 3, 0)]
    #[case(vec![1, 2, 3], 4, 0)]
    #[case(vec![1, 9, 1, 9, 1], 2, 0)]
    fn window_increases(#[case] depths: Vec<u64>, #[case] window: usize, #[case] expected: usize) {
        let res = count_window_increases(&depths, window);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), expected);
    }

    #[test]
    fn zero_window() {
        assert!(matches!(
            count_window_increases(&[1, 2], 0),
            Err(SweepError::EmptyWindow)
        ));
    }

    #[test]
    fn bad_measurement() {
        let res = parse_depths("199\n2x0\n");
        assert!(matches!(res, Err(SweepError::Input(_))));
    }
}
