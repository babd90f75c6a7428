use std::num::ParseIntError;

use nom::{
    bytes::complete::take_while1,
    combinator::map_res,
    error::{FromExternalError, ParseError},
    IResult,
};
use thiserror::Error;
use tracing::debug;
use util::{lines_of, parse_nice, InputError, Span};

#[derive(Error, Debug)]
pub enum DiagnosticError {
    #[error("Unable to parse diagnostic report")]
    Input(#[from] InputError),

    #[error("Diagnostic report is empty")]
    Empty,

    #[error("Reports wider than 64 bits are not supported: {0}")]
    TooWide(usize),

    #[error("{criteria:?} rating is ambiguous: {remaining} values left after every bit")]
    AmbiguousRating {
        criteria: BitCriteria,
        remaining: usize,
    },

    #[error("Answer overflows: {0} * {1}")]
    Overflow(u64, u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitCriteria {
    MostCommon,
    LeastCommon,
}

/// Binary numbers all read with the width of the longest line.
#[derive(Debug, Clone)]
pub struct Report {
    values: Vec<u64>,
    width: usize,
}

impl Report {
    pub fn new(values: Vec<u64>, width: usize) -> Result<Self, DiagnosticError> {
        if values.is_empty() {
            return Err(DiagnosticError::Empty);
        }
        if width > 64 {
            return Err(DiagnosticError::TooWide(width));
        }
        Ok(Self { values, width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of values with a one in each bit, indexed from the most significant bit.
    pub fn ones_per_bit(&self) -> Vec<usize> {
        (0..self.width)
            .rev()
            .map(|bit| ones_at(&self.values, bit))
            .collect()
    }

    pub fn power_consumption(&self) -> Result<u64, DiagnosticError> {
        let n = self.values.len();
        let mut gamma = 0;
        let mut epsilon = 0;

        for ones in self.ones_per_bit() {
            gamma <<= 1;
            epsilon <<= 1;
            if ones * 2 > n {
                gamma |= 1;
            } else {
                epsilon |= 1;
            }
        }
        debug!(gamma, epsilon, "power rates");

        checked_product(gamma, epsilon)
    }

    /// Narrows the values bit by bit, from the most significant one, until one is left.
    pub fn rating(&self, criteria: BitCriteria) -> Result<u64, DiagnosticError> {
        let mut current = self.values.clone();

        for bit in (0..self.width).rev() {
            if current.len() == 1 {
                break;
            }

            let ones = ones_at(&current, bit);
            if ones == 0 || ones == current.len() {
                continue;
            }

            let keep_ones = match criteria {
                BitCriteria::MostCommon => ones * 2 >= current.len(),
                BitCriteria::LeastCommon => ones * 2 < current.len(),
            };
            current.retain(|&v| ((v >> bit) & 1 == 1) == keep_ones);
        }

        match current.as_slice() {
            &[value] => Ok(value),
            rest => Err(DiagnosticError::AmbiguousRating {
                criteria,
                remaining: rest.len(),
            }),
        }
    }

    pub fn life_support_rating(&self) -> Result<u64, DiagnosticError> {
        let oxygen = self.rating(BitCriteria::MostCommon)?;
        let co2 = self.rating(BitCriteria::LeastCommon)?;
        debug!(oxygen, co2, "life support ratings");

        checked_product(oxygen, co2)
    }
}

fn checked_product(a: u64, b: u64) -> Result<u64, DiagnosticError> {
    a.checked_mul(b).ok_or(DiagnosticError::Overflow(a, b))
}

fn ones_at(values: &[u64], bit: usize) -> usize {
    values.iter().filter(|&&v| (v >> bit) & 1 == 1).count()
}

fn parse_binary<'a, E>(i: Span<'a>) -> IResult<Span<'a>, (u64, usize), E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, ParseIntError>,
{
    map_res(
        take_while1(|c: char| c == '0' || c == '1'),
        |s: Span<'a>| u64::from_str_radix(s.fragment(), 2).map(|v| (v, s.fragment().len())),
    )(i)
}

pub fn parse_report(input: &str) -> Result<Report, DiagnosticError> {
    let lines = parse_nice(input, lines_of(parse_binary))?;
    let width = lines.iter().map(|&(_, len)| len).max().unwrap_or(0);

    Report::new(lines.into_iter().map(|(v, _)| v).collect(), width)
}

pub fn get_power_consumption(input: &str) -> Result<u64, DiagnosticError> {
    parse_report(input)?.power_consumption()
}

pub fn get_life_support_rating(input: &str) -> Result<u64, DiagnosticError> {
    parse_report(input)?.life_support_rating()
}
