use anyhow::{Context, Result};
use day4::{find_first_win, find_last_win, Game};

fn main() -> Result<()> {
    util::init_tracing()?;

    let game: Game = util::read_input()?.parse()?;

    let first = find_first_win(&game).context("looking for the first winning board")?;
    println!("{}", first.score()?);

    let last = find_last_win(&game).context("looking for the last winning board")?;
    println!("{}", last.score()?);

    Ok(())
}
