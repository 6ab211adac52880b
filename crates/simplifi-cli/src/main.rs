//! Thin binary entrypoint delegating to the CLI runtime.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = simplifi_cli::run().await;
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
