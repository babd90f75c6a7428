use std::{cell::Cell, collections::VecDeque, num::ParseIntError, str::FromStr};

use nom::{
    character::complete::{char, line_ending, multispace0, multispace1, space0, space1},
    combinator::{cut, eof, map, map_res, not, verify},
    error::{FromExternalError, ParseError},
    multi::{many0, separated_list1},
    sequence::{pair, preceded, terminated},
    IResult,
};
use thiserror::Error;
use tracing::{debug, info};
use util::{parse_nice, parse_number, InputError, Span};

#[derive(Error, Debug)]
pub enum BingoError {
    #[error("Unable to parse bingo game")]
    Input(#[from] InputError),

    #[error("Board is not square: row {row} has {columns} numbers, expected {rows}")]
    NotSquare {
        rows: usize,
        row: usize,
        columns: usize,
    },

    #[error("No winner: {never_won} of {boards} boards never completed a row or column")]
    NoWinner { never_won: usize, boards: usize },

    #[error("Score of board {board} overflows: {unmarked_sum} * {draw}")]
    ScoreOverflow {
        board: usize,
        draw: u64,
        unmarked_sum: u128,
    },
}

/// A square grid of numbers, never modified once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Vec<u64>>,
}

impl Board {
    pub fn new(cells: Vec<Vec<u64>>) -> Result<Self, BingoError> {
        let rows = cells.len();
        if let Some((row, columns)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, columns)| columns != rows)
        {
            return Err(BingoError::NotSquare { rows, row, columns });
        }

        Ok(Self { cells })
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[row][col]
    }

    pub fn contains(&self, value: u64) -> bool {
        self.cells.iter().flatten().any(|&v| v == value)
    }

    pub fn sum(&self) -> u128 {
        self.cells.iter().flatten().map(|&v| u128::from(v)).sum()
    }
}

/// Which cells of one board have been drawn so far. Marks are only ever set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkState {
    marks: Vec<Vec<bool>>,
}

impl MarkState {
    pub fn new(size: usize) -> Self {
        Self {
            marks: vec![vec![false; size]; size],
        }
    }

    /// Marks every cell of `board` holding `draw`, returning how many were newly marked.
    pub fn mark(&mut self, board: &Board, draw: u64) -> usize {
        let mut newly_marked = 0;
        for (row, marks) in self.marks.iter_mut().enumerate() {
            for (col, mark) in marks.iter_mut().enumerate() {
                if board.get(row, col) == draw && !*mark {
                    *mark = true;
                    newly_marked += 1;
                }
            }
        }
        newly_marked
    }

    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.marks[row][col]
    }

    pub fn has_won(&self) -> bool {
        let n = self.marks.len();

        let full_row = (0..n).any(|row| (0..n).all(|col| self.marks[row][col]));
        let full_col = (0..n).any(|col| (0..n).all(|row| self.marks[row][col]));

        full_row || full_col
    }

    pub fn unmarked_sum(&self, board: &Board) -> u128 {
        let n = self.marks.len();
        let mut sum = 0;
        for row in 0..n {
            for col in 0..n {
                if !self.marks[row][col] {
                    sum += u128::from(board.get(row, col));
                }
            }
        }
        sum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinResult {
    pub board: usize,
    pub draw: u64,
    pub unmarked_sum: u128,
}

impl WinResult {
    pub fn score(&self) -> Result<u128, BingoError> {
        self.unmarked_sum
            .checked_mul(u128::from(self.draw))
            .ok_or(BingoError::ScoreOverflow {
                board: self.board,
                draw: self.draw,
                unmarked_sum: self.unmarked_sum,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    draws: Vec<u64>,
    boards: Vec<Board>,
}

impl Game {
    pub fn new(draws: Vec<u64>, boards: Vec<Board>) -> Self {
        Self { draws, boards }
    }

    pub fn draws(&self) -> &[u64] {
        &self.draws
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Replays the draws, yielding each board's win in the order the wins happen.
    pub fn replay(&self) -> Replay<'_> {
        Replay {
            game: self,
            marks: self
                .boards
                .iter()
                .map(|board| MarkState::new(board.size()))
                .collect(),
            won: vec![false; self.boards.len()],
            next_draw: 0,
            pending: VecDeque::new(),
        }
    }
}

/// Boards that have already won are neither marked nor tested again. Boards
/// winning on the same draw come out in ascending index order.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    game: &'a Game,
    marks: Vec<MarkState>,
    won: Vec<bool>,
    next_draw: usize,
    pending: VecDeque<WinResult>,
}

impl<'a> Replay<'a> {
    pub fn marks(&self) -> &[MarkState] {
        &self.marks
    }

    /// Applies the next draw, returning it, or `None` once the draws are exhausted.
    fn step(&mut self) -> Option<u64> {
        let draw = *self.game.draws.get(self.next_draw)?;
        self.next_draw += 1;

        for (index, board) in self.game.boards.iter().enumerate() {
            if !self.won[index] {
                self.marks[index].mark(board, draw);
            }
        }

        for (index, board) in self.game.boards.iter().enumerate() {
            if self.won[index] || !self.marks[index].has_won() {
                continue;
            }
            self.won[index] = true;

            let unmarked_sum = self.marks[index].unmarked_sum(board);
            debug!(board = index, draw, unmarked_sum, "board wins");
            self.pending.push_back(WinResult {
                board: index,
                draw,
                unmarked_sum,
            });
        }

        Some(draw)
    }
}

impl<'a> Iterator for Replay<'a> {
    type Item = WinResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(win) = self.pending.pop_front() {
                return Some(win);
            }
            self.step()?;
        }
    }
}

pub fn find_first_win(game: &Game) -> Result<WinResult, BingoError> {
    game.replay().next().ok_or(BingoError::NoWinner {
        never_won: game.boards.len(),
        boards: game.boards.len(),
    })
}

pub fn find_last_win(game: &Game) -> Result<WinResult, BingoError> {
    let (won, last) = game
        .replay()
        .fold((0, None), |(won, _), win| (won + 1, Some(win)));

    match last {
        Some(win) if won == game.boards.len() => Ok(win),
        _ => Err(BingoError::NoWinner {
            never_won: game.boards.len() - won,
            boards: game.boards.len(),
        }),
    }
}

fn parse_draws<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Vec<u64>, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, ParseIntError>,
{
    terminated(separated_list1(char(','), parse_number), space0)(i)
}

fn parse_row<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Vec<u64>, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, ParseIntError>,
{
    preceded(
        space0,
        terminated(separated_list1(space1, parse_number), space0),
    )(i)
}

fn parse_board<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Board, E>
where
    E: ParseError<Span<'a>>
        + FromExternalError<Span<'a>, ParseIntError>
        + FromExternalError<Span<'a>, BingoError>,
{
    map_res(separated_list1(line_ending, parse_row), Board::new)(i)
}

/// The first board fixes the size every later board must have.
fn parse_boards<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Vec<Board>, E>
where
    E: ParseError<Span<'a>>
        + FromExternalError<Span<'a>, ParseIntError>
        + FromExternalError<Span<'a>, BingoError>,
{
    let size = Cell::new(None);

    let result = many0(preceded(
        pair(multispace1, not(eof)),
        cut(verify(parse_board, |board: &Board| {
            let expected = size.get().unwrap_or(board.size());
            size.set(Some(expected));
            board.size() == expected
        })),
    ))(i);
    result
}

fn parse_game<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Game, E>
where
    E: ParseError<Span<'a>>
        + FromExternalError<Span<'a>, ParseIntError>
        + FromExternalError<Span<'a>, BingoError>,
{
    map(
        terminated(pair(parse_draws, parse_boards), multispace0),
        |(draws, boards)| Game { draws, boards },
    )(i)
}

impl FromStr for Game {
    type Err = BingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let game: Game = parse_nice(s, parse_game)?;

        info!(
            draws = game.draws.len(),
            boards = game.boards.len(),
            size = game.boards.first().map(Board::size).unwrap_or(0),
            "parsed bingo game"
        );

        Ok(game)
    }
}

pub fn first_win_score(input: &str) -> Result<u128, BingoError> {
    find_first_win(&input.parse()?)?.score()
}

pub fn last_win_score(input: &str) -> Result<u128, BingoError> {
    find_last_win(&input.parse()?)?.score()
}
