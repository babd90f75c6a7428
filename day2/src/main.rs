use anyhow::Result;
use day2::{aimed_position, parse_commands, plain_position};

fn main() -> Result<()> {
    util::init_tracing()?;

    let commands = parse_commands(&util::read_input()?)?;

    println!("{}", plain_position(&commands).product());
    println!("{}", aimed_position(&commands).product());

    Ok(())
}
