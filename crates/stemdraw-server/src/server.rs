//! The Stemdraw server: owns the pipeline and serves the HTTP API.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use stemdraw_core::{DiagramPipeline, DiagramResult, PipelineSettings, SceneBuilder};
use stemdraw_domains::default_modules;
use stemdraw_layout::LayoutEngine;
use stemdraw_llm::{DeepSeekClient, LlmAuditor, LlmConfig, LlmPlanner, SimulatedAuditor};
use stemdraw_nlp::KeywordExtractor;
use stemdraw_primitives::InMemoryPrimitiveStore;

use crate::api;
use crate::artifacts::ArtifactWriter;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::store::PlanStore;

pub struct StemdrawServer {
    config: ServerConfig,
    pipeline: DiagramPipeline,
    plan_store: PlanStore,
    artifacts: ArtifactWriter,
}

impl StemdrawServer {
    /// Wire the full pipeline from configuration.
    ///
    /// Without a DeepSeek API key the planner stage is absent and the
    /// auditor is the simulated fallback.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;

        let store: Arc<dyn stemdraw_primitives::PrimitiveStore> =
            Arc::new(InMemoryPrimitiveStore::new());

        let (llm_planner, auditor): (
            Option<Arc<dyn stemdraw_core::DiagramPlanner>>,
            Arc<dyn stemdraw_core::DiagramAuditor>,
        ) = match &config.deepseek_api_key {
            Some(api_key) => {
                let llm_config = LlmConfig::new(api_key.clone())
                    .with_base_url(config.deepseek_api_url.clone())
                    .with_model(config.deepseek_model.clone());
                let client = DeepSeekClient::new(llm_config)?;
                info!(model = %config.deepseek_model, "LLM planner and auditor enabled");
                (
                    Some(Arc::new(LlmPlanner::new(client.clone()))
                        as Arc<dyn stemdraw_core::DiagramPlanner>),
                    Arc::new(LlmAuditor::new(client))
                        as Arc<dyn stemdraw_core::DiagramAuditor>,
                )
            }
            None => {
                info!("running without LLM: rule-based planning, simulated audit");
                (
                    None,
                    Arc::new(SimulatedAuditor::new()) as Arc<dyn stemdraw_core::DiagramAuditor>,
                )
            }
        };

        let pipeline = DiagramPipeline::new(
            Arc::new(KeywordExtractor::new()),
            Arc::new(SceneBuilder::new()),
            llm_planner,
            Arc::new(LayoutEngine::new()),
            default_modules(store),
            auditor,
            PipelineSettings {
                quality_threshold: config.quality_threshold,
                max_refinement_passes: config.max_refinement_passes,
            },
        );

        let artifacts = ArtifactWriter::new(config.output_dir.clone());

        Ok(Self {
            config,
            pipeline,
            plan_store: PlanStore::new(),
            artifacts,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &DiagramPipeline {
        &self.pipeline
    }

    pub fn plan_store(&self) -> &PlanStore {
        &self.plan_store
    }

    pub fn artifacts(&self) -> &ArtifactWriter {
        &self.artifacts
    }

    /// Run the pipeline and persist the result under the output directory.
    pub async fn generate(&self, problem_text: &str) -> ServerResult<(DiagramResult, Vec<String>)> {
        let result = self.pipeline.generate(problem_text).await?;
        let written = self.artifacts.write_result(&result).await?;
        let files = written
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();
        Ok((result, files))
    }

    /// Bind and serve until shutdown.
    pub async fn run(self: Arc<Self>) -> ServerResult<()> {
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let app = api::build_router(self.clone());

        info!(%addr, "Stemdraw server listening");
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|err| ServerError::InternalError(format!("bind failed: {}", err)))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| ServerError::InternalError(format!("server error: {}", err)))?;
        info!("Stemdraw server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_api_key_disables_llm_and_simulates_audit() {
        let server = StemdrawServer::from_config(ServerConfig::default()).unwrap();
        assert!(!server.pipeline().has_llm_planner());
        assert!(server.pipeline().audit_is_simulated());
    }

    #[test]
    fn api_key_enables_llm_planner_and_auditor() {
        let config = ServerConfig {
            deepseek_api_key: Some("test-key".to_string()),
            ..ServerConfig::default()
        };
        let server = StemdrawServer::from_config(config).unwrap();
        assert!(server.pipeline().has_llm_planner());
        assert!(!server.pipeline().audit_is_simulated());
    }
}
