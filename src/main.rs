#[tokio::main]
async fn main() {
    donation::start_server().await;
}
