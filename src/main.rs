use clap::Parser;
use miette::Result;
use stylefn::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval(args) => stylefn::cli::eval::run(args)?,
        Commands::Validate(args) => stylefn::cli::validate::run(args)?,
        Commands::Completions(args) => stylefn::cli::completions::run(args)?,
    }

    Ok(())
}
