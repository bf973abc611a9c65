//! `modsmith` command-line entry point

fn main() -> anyhow::Result<()> {
    modsmith::cli::run_cli()
}
