use chatmod::cli::{parse_args, run_cli_command};
use color_eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    run_cli_command(parse_args(std::env::args()))
}
