#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_event_pump::init().await
}
