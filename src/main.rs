use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = patchbay::cli::Cli::parse();
    if let Err(e) = patchbay::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
