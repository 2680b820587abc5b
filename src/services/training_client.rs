use crate::error::AppError;
use crate::models::performance_types::{ImagePerformance, IterationPerformance};
use crate::models::training_types::{
    ImageCreateSummary, ImageFileCreateBatch, Iteration, Project, Tag,
};

/// Path prefix shared by every training operation.
const TRAINING_API_ROOT: &str = "customvision/v3.3/training";
/// Header carrying the service credential.
const TRAINING_KEY_HEADER: &str = "Training-Key";
/// Page size when fetching per-image performance.
const IMAGE_PERFORMANCE_PAGE: usize = 256;

/// Typed client for the hosted training API. Owns the underlying HTTP
/// client; construct once and hand it to the trainer.
pub struct TrainingClient {
    http: reqwest::Client,
    endpoint: String,
    training_key: String,
}

impl TrainingClient {
    pub fn new(endpoint: &str, training_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            training_key: training_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.endpoint, TRAINING_API_ROOT, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.url(path))
            .header(TRAINING_KEY_HEADER, &self.training_key)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.url(path))
            .header(TRAINING_KEY_HEADER, &self.training_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError {
            message: format!(
                "Training service returned HTTP {}: {}",
                status,
                body.trim()
            ),
        })
    }

    pub async fn create_project(&self, name: &str) -> Result<Project, AppError> {
        let response = self
            .post("projects")
            .query(&[("name", name), ("classificationType", "Multiclass")])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_tag(&self, project_id: &str, name: &str) -> Result<Tag, AppError> {
        let response = self
            .post(&format!("projects/{}/tags", project_id))
            .query(&[("name", name)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_images_from_files(
        &self,
        project_id: &str,
        batch: ImageFileCreateBatch,
    ) -> Result<ImageCreateSummary, AppError> {
        let response = self
            .post(&format!("projects/{}/images/files", project_id))
            .json(&batch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn train_project(&self, project_id: &str) -> Result<Iteration, AppError> {
        let response = self
            .post(&format!("projects/{}/train", project_id))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn get_iteration(
        &self,
        project_id: &str,
        iteration_id: &str,
    ) -> Result<Iteration, AppError> {
        let response = self
            .get(&format!("projects/{}/iterations/{}", project_id, iteration_id))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn get_iteration_performance(
        &self,
        project_id: &str,
        iteration_id: &str,
    ) -> Result<IterationPerformance, AppError> {
        let response = self
            .get(&format!(
                "projects/{}/iterations/{}/performance",
                project_id, iteration_id
            ))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Per-image performance for the iteration. The service pages this
    /// listing, so pages are fetched until one comes back short.
    pub async fn get_image_performances(
        &self,
        project_id: &str,
        iteration_id: &str,
    ) -> Result<Vec<ImagePerformance>, AppError> {
        let path = format!(
            "projects/{}/iterations/{}/performance/images",
            project_id, iteration_id
        );

        let mut all = Vec::new();
        let mut skip = 0usize;

        loop {
            let response = self
                .get(&path)
                .query(&[
                    ("take", IMAGE_PERFORMANCE_PAGE.to_string()),
                    ("skip", skip.to_string()),
                ])
                .send()
                .await?;
            let page: Vec<ImagePerformance> = Self::check(response).await?.json().await?;

            let count = page.len();
            all.extend(page);

            if count < IMAGE_PERFORMANCE_PAGE {
                break;
            }
            skip += count;
        }

        Ok(all)
    }
}
