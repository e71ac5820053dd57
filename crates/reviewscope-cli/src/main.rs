use std::process;

#[tokio::main]
async fn main() {
    let code = reviewscope_cli::run().await;
    process::exit(code);
}
