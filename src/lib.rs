pub mod config;
pub mod error;
pub mod models;
pub mod services;

use config::TrainerConfig;
use error::AppError;
use services::trainer::ClassificationTrainer;
use services::training_client::TrainingClient;

/// Runs the full training sequence: create the project, upload every
/// qualifying class folder, train, wait for completion and print the
/// performance statistics. The client lives for exactly this call.
pub async fn run(config: TrainerConfig) -> Result<(), AppError> {
    let client = TrainingClient::new(&config.endpoint, &config.training_key);
    let trainer = ClassificationTrainer::new(client, &config);

    let project_id = trainer.create_project(&config.project_name).await?;
    trainer
        .upload_training_images(&project_id, &config.image_root)
        .await?;
    let iteration = trainer.train_model(&project_id).await?;

    println!("Press enter to display statistics.");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    trainer.display_statistics(&project_id, &iteration).await?;

    Ok(())
}
