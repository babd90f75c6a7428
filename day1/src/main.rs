use anyhow::Result;
use day1::{count_increases, count_window_increases, parse_depths};

fn main() -> Result<()> {
    util::init_tracing()?;

    let depths = parse_depths(&util::read_input()?)?;

    println!("{}", count_increases(&depths));
    println!("{}", count_window_increases(&depths, 3)?);

    Ok(())
}
