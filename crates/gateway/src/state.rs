use std::sync::Arc;

use {
    chanlog_access::AllowListStore, chanlog_archive::ArtifactStore, chanlog_export::ExportPipeline,
};

/// Shared app state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub allow_lists: Arc<AllowListStore>,
    pub artifacts: Arc<ArtifactStore>,
    pub pipeline: Arc<ExportPipeline>,
}
