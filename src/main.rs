use std::io::IsTerminal;
use std::sync::Arc;

use crate::args::{Cli, Commands};
use crabdrop::{
    client::TransferClient,
    config::Config,
    endpoint::{self, Location, StaticLocation},
    ip_lookup,
    render::TerminalSink,
    save::FileSaver,
    transport::http::HttpTransport,
};

mod args;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crabdrop=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_guide(location: &dyn Location) {
    let base = endpoint::resolve(location);
    println!("Files are served from {}", base);
    println!("To upload, type:");
    println!("$ crabdrop upload <file>");
    println!("To download or delete, pass the file ID and name (the part that came after {}):", base);
    println!("$ crabdrop download <file_id>/<file_name>");
    println!("$ crabdrop delete <file_id>/<file_name>");
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse_arguments();
    let config = Config::from_env()?.with_overrides(cli.origin.clone(), cli.output_dir.clone())?;
    let location = Arc::new(StaticLocation::new(&config.origin)?);

    let show_progress = !cli.quiet && std::io::stderr().is_terminal();
    let transport = HttpTransport::new(config.timeout)?.with_progress(show_progress);

    let client = TransferClient::new(
        Arc::new(transport),
        location.clone(),
        Arc::new(FileSaver::new(&config.download_dir)),
        Arc::new(TerminalSink),
    );

    match &cli.command {
        Some(Commands::Upload { file_paths }) => client.handle_uploads(file_paths.as_slice()).await,
        Some(Commands::Download { ids }) => client.handle_downloads(ids).await,
        Some(Commands::Delete { ids }) => client.handle_deletes(ids).await,
        Some(Commands::Endpoint) => print_guide(location.as_ref()),
        None => {
            println!("Welcome to 🦀📦 crabdrop!");
            println!("Please give a valid command");
            print_guide(location.as_ref());

            let lookup_client = reqwest::Client::builder().timeout(config.timeout).build()?;
            match ip_lookup::lookup_public_ip(&lookup_client, &config.ip_lookup_url).await {
                Ok(ip) => println!("Your public IP is {}", ip),
                Err(e) => tracing::warn!("could not look up public IP: {}", e),
            }
        }
    }

    Ok(())
}
