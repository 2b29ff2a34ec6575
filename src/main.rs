use subdomain_routes::cli::run_cli;
use subdomain_routes::logging::{init_logging_with_config, LogConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_with_config(&LogConfig::from_env())?;
    run_cli()
}
