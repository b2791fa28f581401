//! Application state for the benefit consolidation API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::llm::LanguageModel;
use crate::orchestrator::Orchestrator;
use crate::report::{ReportWriter, XlsxReportWriter};
use crate::sources::{DirectorySourceReader, SourceReader};

/// Shared application state.
///
/// Holds the loaded configuration and the collaborators a consolidation
/// needs: where sources come from, where reports go and the optional model.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    orchestrator: Orchestrator,
    model: Option<Arc<dyn LanguageModel>>,
    sources: Arc<dyn SourceReader>,
    reports: Arc<dyn ReportWriter>,
}

impl AppState {
    /// Creates state that reads and writes the directories named in the
    /// configuration.
    pub fn new(config: ConfigLoader, model: Option<Arc<dyn LanguageModel>>) -> Self {
        let sources = Arc::new(DirectorySourceReader::new(
            config.config().sources.directory.clone(),
        ));
        let reports = Arc::new(XlsxReportWriter::new(
            config.config().sources.output_directory.clone(),
        ));
        Self::with_collaborators(config, model, sources, reports)
    }

    /// Creates state with explicit source and report collaborators.
    pub fn with_collaborators(
        config: ConfigLoader,
        model: Option<Arc<dyn LanguageModel>>,
        sources: Arc<dyn SourceReader>,
        reports: Arc<dyn ReportWriter>,
    ) -> Self {
        let orchestrator = Orchestrator::new(config.config().clone(), model.clone());
        Self {
            config: Arc::new(config),
            orchestrator,
            model,
            sources,
            reports,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The orchestrator built from this configuration and model.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// The language model, if configured.
    pub fn model(&self) -> Option<&Arc<dyn LanguageModel>> {
        self.model.as_ref()
    }

    /// Where sources are read from.
    pub fn sources(&self) -> &dyn SourceReader {
        &*self.sources
    }

    /// Where reports are written.
    pub fn reports(&self) -> &dyn ReportWriter {
        &*self.reports
    }
}
