use crate::config::settings::AppConfig;
use crate::infrastructure::media::MediaTools;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub media: MediaTools,
}

impl AppState {
    pub fn new(config: AppConfig, media: MediaTools) -> Self {
        Self { config, media }
    }
}
