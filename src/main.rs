use vision_trainer::config::TrainerConfig;

#[tokio::main]
async fn main() {
    println!("Image classification training");
    println!();

    let config = TrainerConfig::load_or_default();

    if let Err(e) = vision_trainer::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
