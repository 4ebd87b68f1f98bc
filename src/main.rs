use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use phpipam_search::{Config, IpamError, SearchController, Session, Subnet};

/// Search a phpIPAM server for subnets.
///
/// Connection settings come from PHPIPAM_APP_ID, PHPIPAM_ENDPOINT_ADDR,
/// PHPIPAM_USER_NAME and PHPIPAM_PASSWORD.
#[derive(Debug, Parser)]
#[command(name = "ipam-search", version)]
struct Cli {
    /// Free-text search term.
    term: String,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    config.validate().context("invalid phpIPAM configuration")?;
    info!(endpoint = %config.endpoint, app_id = %config.app_id, "using phpIPAM endpoint");

    let mut controller = SearchController::new(Session::new(config))?;
    controller
        .client_mut()
        .login()
        .await
        .context("failed to log in to phpIPAM")?;

    match controller.search_subnets(&cli.term).await {
        Ok(subnets) => print_subnets(&subnets, cli.json),
        Err(err @ IpamError::SubnetAddress { .. }) => {
            print_subnets(err.partial_subnets(), cli.json)?;
            Err(err).context("search returned a malformed subnet address")
        }
        Err(err) => Err(err).with_context(|| format!("search for '{}' failed", cli.term)),
    }
}

fn print_subnets(subnets: &[Subnet], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(subnets)?);
        return Ok(());
    }

    if subnets.is_empty() {
        println!("No subnets found.");
        return Ok(());
    }

    println!("{:<6} {:<20} DESCRIPTION", "ID", "SUBNET");
    for subnet in subnets {
        println!("{:<6} {:<20} {}", subnet.id, subnet.cidr(), subnet.description);
    }
    Ok(())
}
