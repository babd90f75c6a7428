use std::{
    env, fs,
    io::{self, BufRead},
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use miette::{GraphicalReportHandler, GraphicalTheme};
use nom::{
    character::complete::{char, digit1, line_ending, multispace0},
    combinator::{map_res, opt, recognize},
    error::{FromExternalError, ParseError},
    multi::separated_list1,
    sequence::{pair, terminated},
    IResult, Parser,
};
use nom_locate::LocatedSpan;
use nom_supreme::{
    error::{BaseErrorKind, ErrorTree, GenericErrorTree},
    final_parser::final_parser,
};
use tracing_subscriber::{prelude::*, EnvFilter};

// Thanks to FasterThanLime! https://fasterthanli.me/series/advent-of-code-2022/part-11

pub type Span<'a> = LocatedSpan<&'a str>;

type ErrorKind = BaseErrorKind<&'static str, Box<dyn std::error::Error + Send + Sync>>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("bad input")]
struct BadInput<'a> {
    #[source_code]
    src: &'a str,

    #[label("{kind}")]
    bad_bit: miette::SourceSpan,

    kind: ErrorKind,
}

/// Puzzle input that could not be parsed. Carries a rendered report pointing
/// at the offending location.
#[derive(thiserror::Error, Debug)]
#[error("bad input at byte {offset}\n{report}")]
pub struct InputError {
    offset: usize,
    report: String,
}

impl InputError {
    pub fn offset(&self) -> usize {
        self.offset
    }
}

pub fn parse_number<'a, T, E>(i: Span<'a>) -> IResult<Span<'a>, T, E>
where
    T: FromStr,
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, T::Err>,
{
    map_res(recognize(pair(opt(char('-')), digit1)), |i: Span<'a>| {
        T::from_str(i.fragment())
    })(i)
}

/// One item per line, tolerating trailing blank lines.
pub fn lines_of<'a, O, E, F>(parser: F) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, Vec<O>, E>
where
    F: Parser<Span<'a>, O, E>,
    E: ParseError<Span<'a>>,
{
    terminated(separated_list1(line_ending, parser), multispace0)
}

fn innermost_base(tree: ErrorTree<Span<'_>>) -> Option<(Span<'_>, ErrorKind)> {
    match tree {
        GenericErrorTree::Base { location, kind } => Some((location, kind)),
        GenericErrorTree::Stack { base, .. } => innermost_base(*base),
        // the alternative that got furthest is the most useful one to report
        GenericErrorTree::Alt(alternatives) => alternatives
            .into_iter()
            .filter_map(innermost_base)
            .max_by_key(|(location, _)| location.location_offset()),
    }
}

fn render(src: &str, offset: usize, kind: ErrorKind) -> String {
    let fallback = kind.to_string();
    let err = BadInput {
        src,
        bad_bit: miette::SourceSpan::new(offset.into(), 0.into()),
        kind,
    };
    let mut s = String::new();
    match GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut s, &err)
    {
        Ok(()) => s,
        Err(_) => fallback,
    }
}

/// Runs `parse_fun` over the whole of `l`, which must be consumed completely.
pub fn parse_nice<'a, T, F>(l: &'a str, parse_fun: F) -> Result<T, InputError>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, T, ErrorTree<Span<'a>>>,
{
    let span = Span::new(l);
    let parsed: Result<_, ErrorTree<Span>> = final_parser(parse_fun)(span);

    parsed.map_err(|e| match innermost_base(e) {
        Some((location, kind)) => {
            let offset = location.location_offset();
            InputError {
                offset,
                report: render(l, offset, kind),
            }
        }
        None => InputError {
            offset: 0,
            report: "no alternative matched".to_string(),
        },
    })
}

pub fn read_input_as_string() -> Result<String> {
    let stdin = io::stdin();

    Itertools::intersperse_with(stdin.lock().lines(), || Ok("\n".to_string()))
        .collect::<std::result::Result<String, _>>()
        .context("failed to read input from stdin")
}

pub fn read_input_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read input from {}", path.display()))
}

/// Reads the file named by the first argument, or stdin when there is none.
pub fn read_input() -> Result<String> {
    match env::args_os().nth(1) {
        Some(path) => read_input_file(Path::new(&path)),
        None => read_input_as_string(),
    }
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() -> Result<()> {
    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::character::complete::space1;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("-17", -17)]
    fn parse_number_ok(#[case] input: &str, #[case] expected: i64) {
        let res = parse_nice(input, parse_number::<i64, _>);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), expected);
    }

    #[test]
    fn parse_number_rejects_negative_unsigned() {
        let res = parse_nice("-3", parse_number::<u32, _>);
        assert!(res.is_err());
    }

    #[test]
    fn lines_of_tolerates_trailing_newlines() {
        let res = parse_nice("1\n2\n3\n\n", lines_of(parse_number::<u8, _>));
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn bad_input_points_at_offending_token() {
        let res = parse_nice("1 2\n3 x", lines_of(separated_list1(space1, parse_number::<u8, _>)));
        let err = res.unwrap_err();
        assert_eq!(err.offset(), 6);
        assert!(err.to_string().contains("bad input"));
    }
}
