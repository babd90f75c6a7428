use std::num::ParseIntError;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::space1,
    combinator::map,
    error::{FromExternalError, ParseError},
    sequence::{preceded, terminated},
    IResult,
};
use thiserror::Error;
use tracing::debug;
use util::{lines_of, parse_nice, parse_number, InputError, Span};

#[derive(Error, Debug)]
pub enum DiveError {
    #[error("Unable to parse course")]
    Input(#[from] InputError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Forward(i64),
    Down(i64),
    Up(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub horizontal: i64,
    pub depth: i64,
    pub aim: i64,
}

impl Position {
    /// `down` and `up` move the submarine directly.
    fn apply_plain(mut self, command: Command) -> Self {
        match command {
            Command::Forward(x) => self.horizontal += x,
            Command::Down(x) => self.depth += x,
            Command::Up(x) => self.depth -= x,
        }
        self
    }

    /// `down` and `up` only turn the submarine; `forward` dives along the aim.
    fn apply_aimed(mut self, command: Command) -> Self {
        match command {
            Command::Forward(x) => {
                self.horizontal += x;
                self.depth += x * self.aim;
            }
            Command::Down(x) => self.aim += x,
            Command::Up(x) => self.aim -= x,
        }
        self
    }

    pub fn product(&self) -> i64 {
        self.horizontal * self.depth
    }
}

fn parse_command<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Command, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, ParseIntError>,
{
    alt((
        map(
            preceded(terminated(tag("forward"), space1), parse_number),
            Command::Forward,
        ),
        map(
            preceded(terminated(tag("down"), space1), parse_number),
            Command::Down,
        ),
        map(
            preceded(terminated(tag("up"), space1), parse_number),
            Command::Up,
        ),
    ))(i)
}

pub fn parse_commands(input: &str) -> Result<Vec<Command>, DiveError> {
    Ok(parse_nice(input, lines_of(parse_command))?)
}

pub fn plain_position(commands: &[Command]) -> Position {
    let position = commands
        .iter()
        .fold(Position::default(), |p, &c| p.apply_plain(c));
    debug!(?position, "plain course done");
    position
}

pub fn aimed_position(commands: &[Command]) -> Position {
    let position = commands
        .iter()
        .fold(Position::default(), |p, &c| p.apply_aimed(c));
    debug!(?position, "aimed course done");
    position
}

pub fn get_plain_product(input: &str) -> Result<i64, DiveError> {
    Ok(plain_position(&parse_commands(input)?).product())
}

pub fn get_aimed_product(input: &str) -> Result<i64, DiveError> {
    Ok(aimed_position(&parse_commands(input)?).product())
}
