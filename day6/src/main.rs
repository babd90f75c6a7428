use anyhow::Result;
use day6::{parse_school, population_after};

fn main() -> Result<()> {
    util::init_tracing()?;

    let school = parse_school(&util::read_input()?)?;

    println!("{}", population_after(&school, 80));
    println!("{}", population_after(&school, 256));

    Ok(())
}
