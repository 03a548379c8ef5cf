#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Delegate to the server framework entry point.
    tictactoe_server::run_with_config().await
}
