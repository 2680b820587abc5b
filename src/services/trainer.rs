use crate::config::TrainerConfig;
use crate::error::AppError;
use crate::models::training_types::{ImageFileCreateBatch, ImageFileCreateEntry, Iteration};
use crate::services::fs_service;
use crate::services::report;
use crate::services::training_client::TrainingClient;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// The service rejects upload batches larger than this.
pub const MAX_BATCH_SIZE: usize = 64;

/// How training status is re-checked while a run is in progress.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

/// Drives one full training run against the service: upload per-class
/// images, train, wait, report. Owns the API client it was built with.
pub struct ClassificationTrainer {
    client: TrainingClient,
    images_per_class: usize,
    max_classes: usize,
    poll: PollSettings,
}

impl ClassificationTrainer {
    pub fn new(client: TrainingClient, config: &TrainerConfig) -> Self {
        Self {
            client,
            images_per_class: config.images_per_class,
            max_classes: config.max_classes,
            poll: PollSettings {
                interval: Duration::from_secs(config.poll_interval_secs),
                timeout: Duration::from_secs(config.poll_timeout_secs),
            },
        }
    }

    pub async fn create_project(&self, name: &str) -> Result<String, AppError> {
        println!("Creating project {}...", name);
        let project = self.client.create_project(name).await?;
        println!("Done! Project id: {}", project.id);
        println!();
        Ok(project.id)
    }

    /// Uploads every qualifying class folder under `image_root`, one class
    /// at a time, in folder-selection order.
    pub async fn upload_training_images(
        &self,
        project_id: &str,
        image_root: &Path,
    ) -> Result<(), AppError> {
        println!("Uploading training images...");

        let class_folders =
            fs_service::select_class_folders(image_root, self.images_per_class, self.max_classes)?;

        for class_name in &class_folders {
            println!("    Uploading and tagging {}...", class_name);
            self.upload_class(project_id, &image_root.join(class_name), class_name)
                .await?;
        }

        println!("Done!");
        println!();
        Ok(())
    }

    async fn upload_class(
        &self,
        project_id: &str,
        folder: &Path,
        class_name: &str,
    ) -> Result<(), AppError> {
        let tag = self.client.create_tag(project_id, class_name).await?;
        let tag_ids = vec![tag.id];

        upload_folder_images(folder, self.images_per_class, |images| {
            let batch = ImageFileCreateBatch {
                images,
                tag_ids: tag_ids.clone(),
            };
            async move {
                let summary = self
                    .client
                    .create_images_from_files(project_id, batch)
                    .await?;
                if !summary.is_batch_successful {
                    eprintln!(
                        "    Warning: the service rejected some images in {}",
                        class_name
                    );
                }
                Ok(())
            }
        })
        .await?;

        Ok(())
    }

    /// Requests training and waits until the iteration settles. Any
    /// terminal status other than "Completed" is an error.
    pub async fn train_model(&self, project_id: &str) -> Result<Iteration, AppError> {
        let iteration = self.client.train_project(project_id).await?;
        println!("Training");

        let iteration_id = iteration.id.clone();
        let settled = poll_until_settled(
            || {
                print!(".");
                let _ = std::io::stdout().flush();
                self.client.get_iteration(project_id, &iteration_id)
            },
            self.poll,
        )
        .await?;

        if !settled.is_completed() {
            println!();
            return Err(AppError {
                message: format!("Training ended with status {}", settled.status),
            });
        }
        println!("Complete!");

        if let Some(duration) = settled.training_time() {
            println!("Training time: {}", report::format_duration(duration));
        }
        println!();

        Ok(settled)
    }

    /// Fetches and prints iteration-level, per-image and per-tag
    /// performance for a completed iteration.
    pub async fn display_statistics(
        &self,
        project_id: &str,
        iteration: &Iteration,
    ) -> Result<(), AppError> {
        let performance = self
            .client
            .get_iteration_performance(project_id, &iteration.id)
            .await?;
        let image_performances = self
            .client
            .get_image_performances(project_id, &iteration.id)
            .await?;

        print!("{}", report::render_iteration_performance(&performance));
        print!("{}", report::render_image_performances(&image_performances));
        print!(
            "{}",
            report::render_per_tag_performance(&performance.per_tag_performance)
        );
        Ok(())
    }
}

/// Reads the files of one class folder in enumeration order, stopping once
/// `cap` files have been read, and hands them to `submit` in batches of at
/// most [`MAX_BATCH_SIZE`]. A non-empty final partial batch is submitted
/// last; an empty one is not. Returns the number of files uploaded.
///
/// Generic over the submit sink so the batch accounting is testable
/// without a remote service.
pub async fn upload_folder_images<F, Fut>(
    folder: &Path,
    cap: usize,
    mut submit: F,
) -> Result<usize, AppError>
where
    F: FnMut(Vec<ImageFileCreateEntry>) -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let files = fs_service::list_files(folder)?;

    let mut images = Vec::new();
    let mut uploaded = 0usize;

    for file in &files {
        if uploaded == cap {
            break;
        }

        let name = file
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let bytes = tokio::fs::read(file).await?;
        images.push(ImageFileCreateEntry::from_bytes(name, &bytes));
        uploaded += 1;

        if images.len() == MAX_BATCH_SIZE {
            submit(std::mem::take(&mut images)).await?;
        }
    }

    if !images.is_empty() {
        submit(std::mem::take(&mut images)).await?;
    }

    Ok(uploaded)
}

/// Re-fetches an iteration until its status leaves "Training", sleeping
/// `poll.interval` between fetches. Fails once `poll.timeout` has elapsed
/// without the iteration settling, so a hung training run cannot block the
/// caller forever.
pub async fn poll_until_settled<F, Fut>(
    mut fetch: F,
    poll: PollSettings,
) -> Result<Iteration, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Iteration, AppError>>,
{
    let deadline = Instant::now() + poll.timeout;

    loop {
        let iteration = fetch().await?;
        if !iteration.is_training() {
            return Ok(iteration);
        }

        if Instant::now() >= deadline {
            return Err(AppError {
                message: format!(
                    "Training still in progress after {}s, giving up",
                    poll.timeout.as_secs()
                ),
            });
        }
        sleep(poll.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fill_folder(dir: &Path, file_count: usize) {
        for i in 0..file_count {
            fs::write(dir.join(format!("img_{:04}.jpg", i)), b"fake image data").unwrap();
        }
    }

    fn iteration_with_status(status: &str) -> Iteration {
        Iteration {
            id: "it-1".to_string(),
            name: None,
            status: status.to_string(),
            created: chrono::Utc::now(),
            last_modified: None,
            trained_at: None,
        }
    }

    #[tokio::test]
    async fn test_upload_splits_into_capped_batches() {
        let dir = tempdir().unwrap();
        fill_folder(dir.path(), 130);

        let mut sizes = Vec::new();
        let uploaded = upload_folder_images(dir.path(), 100, |images| {
            sizes.push(images.len());
            async { Ok::<(), AppError>(()) }
        })
        .await
        .unwrap();

        assert_eq!(uploaded, 100);
        assert_eq!(sizes, vec![64, 36]);
    }

    #[tokio::test]
    async fn test_upload_single_partial_batch() {
        let dir = tempdir().unwrap();
        fill_folder(dir.path(), 12);

        let mut sizes = Vec::new();
        let uploaded = upload_folder_images(dir.path(), 10, |images| {
            sizes.push(images.len());
            async { Ok::<(), AppError>(()) }
        })
        .await
        .unwrap();

        assert_eq!(uploaded, 10);
        assert_eq!(sizes, vec![10]);
    }

    #[tokio::test]
    async fn test_upload_exact_batch_size_submits_once() {
        let dir = tempdir().unwrap();
        fill_folder(dir.path(), 70);

        let mut sizes = Vec::new();
        let uploaded = upload_folder_images(dir.path(), 64, |images| {
            sizes.push(images.len());
            async { Ok::<(), AppError>(()) }
        })
        .await
        .unwrap();

        assert_eq!(uploaded, 64);
        assert_eq!(sizes, vec![64]);
    }

    #[tokio::test]
    async fn test_upload_empty_folder_submits_nothing() {
        let dir = tempdir().unwrap();

        let mut sizes = Vec::new();
        let uploaded = upload_folder_images(dir.path(), 100, |images| {
            sizes.push(images.len());
            async { Ok::<(), AppError>(()) }
        })
        .await
        .unwrap();

        assert_eq!(uploaded, 0);
        assert!(sizes.is_empty());
    }

    #[tokio::test]
    async fn test_upload_stops_on_submit_error() {
        let dir = tempdir().unwrap();
        fill_folder(dir.path(), 130);

        let result = upload_folder_images(dir.path(), 130, |_| async {
            Err(AppError::from("service refused the batch"))
        })
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_selected_classes_upload_one_batch_each() {
        let root = tempdir().unwrap();
        for (name, count) in [("a", 12), ("b", 3), ("c", 20)] {
            let dir = root.path().join(name);
            fs::create_dir(&dir).unwrap();
            fill_folder(&dir, count);
        }

        let folders = fs_service::select_class_folders(root.path(), 10, 2).unwrap();
        assert_eq!(folders.len(), 2);

        for folder in &folders {
            let mut sizes = Vec::new();
            let uploaded =
                upload_folder_images(&root.path().join(folder), 10, |images| {
                    sizes.push(images.len());
                    async { Ok::<(), AppError>(()) }
                })
                .await
                .unwrap();

            assert_eq!(uploaded, 10);
            assert_eq!(sizes, vec![10]);
        }
    }

    #[tokio::test]
    async fn test_poll_stops_on_first_settled_status() {
        let mut statuses = ["Training", "Training", "Completed"].into_iter();
        let mut fetches = 0;

        let settled = poll_until_settled(
            || {
                fetches += 1;
                let status = statuses.next().expect("fetched past the terminal status");
                async move { Ok(iteration_with_status(status)) }
            },
            PollSettings {
                interval: Duration::ZERO,
                timeout: Duration::from_secs(5),
            },
        )
        .await
        .unwrap();

        assert_eq!(fetches, 3);
        assert_eq!(settled.status, "Completed");
    }

    #[tokio::test]
    async fn test_poll_returns_failed_status_to_caller() {
        let settled = poll_until_settled(
            || async { Ok(iteration_with_status("Failed")) },
            PollSettings {
                interval: Duration::ZERO,
                timeout: Duration::from_secs(5),
            },
        )
        .await
        .unwrap();

        assert_eq!(settled.status, "Failed");
        assert!(!settled.is_completed());
    }

    #[tokio::test]
    async fn test_poll_times_out() {
        let result = poll_until_settled(
            || async { Ok(iteration_with_status("Training")) },
            PollSettings {
                interval: Duration::ZERO,
                timeout: Duration::ZERO,
            },
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_poll_propagates_fetch_errors() {
        let result = poll_until_settled(
            || async { Err(AppError::from("connection reset")) },
            PollSettings {
                interval: Duration::ZERO,
                timeout: Duration::from_secs(5),
            },
        )
        .await;

        assert!(result.is_err());
    }
}
