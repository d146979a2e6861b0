//! Diagram audit stage.
//!
//! [`LlmAuditor`] asks the model to critique a generated plan;
//! [`SimulatedAuditor`] derives a verdict from the quality report alone
//! and is used whenever no API key is configured.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use stemdraw_core::{
    AuditReport, AuditVerdict, DiagramAuditor, DiagramPlan, PipelineError, PipelineResult,
    QualityReport,
};

use crate::client::{extract_json, ChatMessage, DeepSeekClient};

const AUDIT_PROMPT: &str = "\
You are a reviewer of generated STEM diagrams. Given a diagram plan and its \
quality report, reply with a single JSON object:
{\"verdict\": \"approved\" | \"needs_revision\" | \"rejected\", \"issues\": [string]}
Approve only plans that are structurally sound and readable.";

/// Below this score the simulated auditor rejects outright.
const REJECT_BELOW: u8 = 40;

#[derive(Deserialize)]
struct WireAudit {
    verdict: String,
    #[serde(default)]
    issues: Vec<String>,
}

fn parse_verdict(value: &str) -> PipelineResult<AuditVerdict> {
    match value {
        "approved" => Ok(AuditVerdict::Approved),
        "needs_revision" => Ok(AuditVerdict::NeedsRevision),
        "rejected" => Ok(AuditVerdict::Rejected),
        other => Err(PipelineError::LlmError(format!(
            "unknown audit verdict '{}'",
            other
        ))),
    }
}

/// Auditor backed by the DeepSeek chat API.
pub struct LlmAuditor {
    client: DeepSeekClient,
}

impl LlmAuditor {
    pub fn new(client: DeepSeekClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DiagramAuditor for LlmAuditor {
    fn is_simulated(&self) -> bool {
        false
    }

    async fn audit(
        &self,
        plan: &DiagramPlan,
        quality: &QualityReport,
    ) -> PipelineResult<AuditReport> {
        let prompt = format!(
            "Plan: {}\nQuality report: {}",
            serde_json::to_string(plan)?,
            serde_json::to_string(quality)?,
        );
        let messages = [ChatMessage::system(AUDIT_PROMPT), ChatMessage::user(prompt)];
        let content = self.client.chat(&messages).await?;
        let json = extract_json(&content)?;
        let wire: WireAudit = serde_json::from_str(json)
            .map_err(|err| PipelineError::LlmError(format!("unparseable audit: {}", err)))?;
        let verdict = parse_verdict(&wire.verdict).unwrap_or_else(|_| {
            warn!(verdict = %wire.verdict, "unknown verdict, treating as needs_revision");
            AuditVerdict::NeedsRevision
        });
        Ok(AuditReport {
            verdict,
            issues: wire.issues,
            simulated: false,
            model: Some(self.client.model().to_string()),
        })
    }
}

/// Heuristic fallback auditor used when no LLM is configured.
///
/// The verdict follows the quality report: passing scores are approved,
/// low scores are rejected, everything between needs revision. Failed
/// checks become the issue list.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAuditor;

impl SimulatedAuditor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiagramAuditor for SimulatedAuditor {
    fn is_simulated(&self) -> bool {
        true
    }

    async fn audit(
        &self,
        _plan: &DiagramPlan,
        quality: &QualityReport,
    ) -> PipelineResult<AuditReport> {
        let verdict = if quality.passed {
            AuditVerdict::Approved
        } else if quality.score >= REJECT_BELOW {
            AuditVerdict::NeedsRevision
        } else {
            AuditVerdict::Rejected
        };
        let issues = quality
            .checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| format!("{}: {}", c.name, c.detail))
            .collect();
        Ok(AuditReport {
            verdict,
            issues,
            simulated: true,
            model: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmConfig;
    use stemdraw_core::{PlanProvenance, ProblemDomain, QualityCheck};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn plan() -> DiagramPlan {
        DiagramPlan::new(ProblemDomain::Circuit, PlanProvenance::RuleBased)
    }

    fn report(score_checks: Vec<QualityCheck>) -> QualityReport {
        QualityReport::from_checks(score_checks, 70)
    }

    #[tokio::test]
    async fn simulated_auditor_approves_passing_quality() {
        let auditor = SimulatedAuditor::new();
        assert!(auditor.is_simulated());
        let audit = auditor
            .audit(&plan(), &report(vec![QualityCheck::pass("a", "ok", 1)]))
            .await
            .unwrap();
        assert_eq!(audit.verdict, AuditVerdict::Approved);
        assert!(audit.simulated);
        assert!(audit.issues.is_empty());
    }

    #[tokio::test]
    async fn simulated_auditor_flags_failing_checks() {
        let auditor = SimulatedAuditor::new();
        let audit = auditor
            .audit(
                &plan(),
                &report(vec![
                    QualityCheck::pass("a", "ok", 1),
                    QualityCheck::fail("closed_loop", "open circuit", 1),
                ]),
            )
            .await
            .unwrap();
        assert_eq!(audit.verdict, AuditVerdict::NeedsRevision);
        assert_eq!(audit.issues, vec!["closed_loop: open circuit"]);
    }

    #[tokio::test]
    async fn simulated_auditor_rejects_very_low_scores() {
        let auditor = SimulatedAuditor::new();
        let audit = auditor
            .audit(&plan(), &report(vec![QualityCheck::fail("a", "bad", 1)]))
            .await
            .unwrap();
        assert_eq!(audit.verdict, AuditVerdict::Rejected);
    }

    #[tokio::test]
    async fn llm_auditor_parses_verdict_and_issues() {
        let server = MockServer::start().await;
        let content = r#"{"verdict": "needs_revision", "issues": ["labels overlap"]}"#;
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        let client =
            DeepSeekClient::new(LlmConfig::new("key").with_base_url(server.uri())).unwrap();
        let auditor = LlmAuditor::new(client);
        assert!(!auditor.is_simulated());
        let audit = auditor
            .audit(&plan(), &report(vec![]))
            .await
            .unwrap();
        assert_eq!(audit.verdict, AuditVerdict::NeedsRevision);
        assert_eq!(audit.issues, vec!["labels overlap"]);
        assert!(!audit.simulated);
        assert_eq!(audit.model.as_deref(), Some("deepseek-chat"));
    }
}
