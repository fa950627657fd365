use version_bump_core::{CoreCliArgs, Parser, dotenv, execute_version_flow, init_logging, style};

fn main() {
    // load .env first so VERSION_BUMP_ROOT can come from it
    dotenv().ok();
    let cli_args = CoreCliArgs::parse();
    init_logging(cli_args.verbose);

    if let Err(e) = execute_version_flow(cli_args) {
        eprintln!(
            "{} {} {}",
            style("❌"),
            style("version-bump failed:").red().bold(),
            style(format!("{e:#}")).red()
        );
        std::process::exit(1);
    }
}
