//! Context summarizer: condenses a briefing into a short bullet summary.

use tracing::{info, warn};

use crate::domain::{Briefing, Summary};
use crate::gateway::{Generation, GenerationGateway};
use crate::prompts::summary_prompt;

/// Makes exactly one gateway call. A failed call yields an empty summary,
/// which the question builder treats as "use the raw briefing".
pub async fn summarize(gateway: &GenerationGateway, briefing: &Briefing) -> Summary {
    match gateway.generate(&summary_prompt(briefing)).await {
        Generation::Generated(text) => {
            info!("Briefing summarized for role '{}'.", briefing.role());
            Summary::new(text)
        }
        Generation::Failed(failure) => {
            warn!(
                "Summary unavailable, continuing with raw briefing: {}",
                failure.reason
            );
            Summary::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{fast_settings, ScriptedBackend};

    fn briefing() -> Briefing {
        Briefing::new("Data Analyst", "SQL dashboards", "Excel, Tableau").unwrap()
    }

    #[tokio::test]
    async fn keeps_generated_summary() {
        let backend = ScriptedBackend::replying(&["- SQL\n- dashboards"]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        let summary = summarize(&gateway, &briefing()).await;
        assert_eq!(summary.as_str(), "- SQL\n- dashboards");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_yields_empty_summary() {
        let gateway = GenerationGateway::new(ScriptedBackend::failing(), fast_settings());
        assert!(summarize(&gateway, &briefing()).await.is_empty());
    }
}
