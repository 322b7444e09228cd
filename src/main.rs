use assetgit::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Run the CLI application
    let app = CliApp::new();
    app.run().await
}
