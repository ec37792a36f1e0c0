use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::intake::extract::ExtractionOrchestrator;
use crate::intake::oracle::Oracle;
use crate::store::IntakeStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The store and oracle sit behind traits so handler logic is
/// testable against in-memory/scripted implementations.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IntakeStore>,
    pub oracle: Arc<dyn Oracle>,
    pub extractor: Arc<ExtractionOrchestrator>,
    pub s3: S3Client,
    pub http: reqwest::Client,
    pub config: Config,
}
