use std::sync::Arc;

use crate::charset::CharsetRegistry;
use crate::config::Config;
use crate::observability::Metrics;
use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub charsets: Arc<CharsetRegistry>,
    pub pipeline: Arc<Pipeline>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, charsets: Arc<CharsetRegistry>, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            charsets,
            pipeline: Arc::new(pipeline),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
