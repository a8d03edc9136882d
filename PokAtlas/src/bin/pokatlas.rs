fn main() -> anyhow::Result<()> {
    pokatlas::cli::run_cli()
}
