use anyhow::Result;
use day3::parse_report;

fn main() -> Result<()> {
    util::init_tracing()?;

    let report = parse_report(&util::read_input()?)?;

    println!("{}", report.power_consumption()?);
    println!("{}", report.life_support_rating()?);

    Ok(())
}
