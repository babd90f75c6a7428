use std::num::ParseIntError;

use nom::{
    character::complete::{char, multispace0},
    combinator::verify,
    error::{FromExternalError, ParseError},
    multi::separated_list1,
    sequence::terminated,
    IResult,
};
use thiserror::Error;
use tracing::debug;
use util::{parse_nice, parse_number, InputError, Span};

const RESET_TIMER: usize = 6;
const NEW_TIMER: usize = 8;

#[derive(Error, Debug)]
pub enum SchoolError {
    #[error("Unable to parse lanternfish timers")]
    Input(#[from] InputError),
}

/// How many fish there are for each timer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct School {
    counts: [u64; NEW_TIMER + 1],
}

impl School {
    fn new(timers: &[usize]) -> Self {
        let mut counts = [0; NEW_TIMER + 1];
        for &timer in timers {
            counts[timer] += 1;
        }
        Self { counts }
    }

    pub fn step(&mut self) {
        let spawning = self.counts[0];
        self.counts.rotate_left(1);
        self.counts[RESET_TIMER] += spawning;
    }

    pub fn population(&self) -> u64 {
        self.counts.iter().sum()
    }
}

fn parse_timers<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Vec<usize>, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, ParseIntError>,
{
    terminated(
        separated_list1(
            char(','),
            verify(parse_number, |timer: &usize| *timer <= NEW_TIMER),
        ),
        multispace0,
    )(i)
}

pub fn parse_school(input: &str) -> Result<School, SchoolError> {
    Ok(School::new(&parse_nice(input, parse_timers)?))
}

pub fn population_after(school: &School, days: usize) -> u64 {
    let mut school = school.clone();
    for _ in 0..days {
        school.step();
    }
    debug!(days, population = school.population(), "school grown");
    school.population()
}

pub fn get_population_after(input: &str, days: usize) -> Result<u64, SchoolError> {
    Ok(population_after(&parse_school(input)?, days))
}
