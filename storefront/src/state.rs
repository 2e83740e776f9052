// storefront/src/state.rs
use crate::config::AppConfig;
use checkout::{OrderGateway, SubmissionPipeline};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub gateway: Arc<dyn OrderGateway>,
  pub config: Arc<AppConfig>,
  /// Built once at startup and shared by every submission.
  pub submissions: Arc<SubmissionPipeline>,
}

impl AppState {
  pub fn new(gateway: Arc<dyn OrderGateway>, config: Arc<AppConfig>) -> Self {
    Self {
      gateway,
      config,
      submissions: Arc::new(SubmissionPipeline::new()),
    }
  }
}
