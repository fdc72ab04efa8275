#[tokio::main]
async fn main() {
    std::process::exit(queuemon::app::startup::collector_startup().await);
}
