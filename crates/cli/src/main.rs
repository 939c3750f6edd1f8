use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    shopkeep_cli::run().await
}
