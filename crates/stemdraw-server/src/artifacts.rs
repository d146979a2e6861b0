//! Artifact writing under the output directory.
//!
//! Each generation run gets its own directory:
//! `<output_dir>/<domain>/<plan_id>/` holding the rendered artifacts
//! (diagram.svg, diagram.tex, graph.json as produced by the domain
//! module) plus `scene.json` (the plan) and `extraction.json` (the NLP
//! report).

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use stemdraw_core::{DiagramResult, DomainModuleArtifact, ProblemDomain};
use uuid::Uuid;

use crate::error::ServerResult;

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_dir(&self, domain: ProblemDomain, plan_id: Uuid) -> PathBuf {
        self.root.join(domain.as_str()).join(plan_id.to_string())
    }

    /// Write a full generation result. Returns the written file paths.
    pub async fn write_result(&self, result: &DiagramResult) -> ServerResult<Vec<PathBuf>> {
        let dir = self.run_dir(result.plan.domain, result.plan.plan_id);
        fs::create_dir_all(&dir).await?;

        let mut written = Vec::new();
        for artifact in &result.artifacts {
            let path = dir.join(artifact.file_name());
            fs::write(&path, &artifact.content).await?;
            written.push(path);
        }

        let scene = dir.join("scene.json");
        fs::write(&scene, serde_json::to_vec_pretty(&result.plan).map_err(
            stemdraw_core::PipelineError::from,
        )?)
        .await?;
        written.push(scene);

        let extraction = dir.join("extraction.json");
        fs::write(
            &extraction,
            serde_json::to_vec_pretty(&result.extraction)
                .map_err(stemdraw_core::PipelineError::from)?,
        )
        .await?;
        written.push(extraction);

        info!(dir = %dir.display(), files = written.len(), "artifacts written");
        Ok(written)
    }

    /// Write standalone artifacts for an editor export.
    pub async fn write_artifacts(
        &self,
        domain: ProblemDomain,
        plan_id: Uuid,
        artifacts: &[DomainModuleArtifact],
    ) -> ServerResult<Vec<PathBuf>> {
        let dir = self.run_dir(domain, plan_id);
        fs::create_dir_all(&dir).await?;
        let mut written = Vec::new();
        for artifact in artifacts {
            let path = dir.join(artifact.file_name());
            fs::write(&path, &artifact.content).await?;
            written.push(path);
        }
        Ok(written)
    }
}
