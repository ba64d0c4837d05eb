#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    training_backend::run().await;
}
