//! The proposal generation orchestrator.
//!
//! Total by contract: whatever happens to the provider call, the caller
//! always gets back a usable, invariant-satisfying [`ProposalOutput`].

use teian_core::fallback::fallback_proposal;
use teian_core::parse::parse_proposal_output;
use teian_core::prompt::build_prompts;
use teian_core::proposal::{ProposalInput, ProposalOutput};

use crate::client::LlmClient;

/// Generate a proposal document for `input`.
///
/// With no client configured the deterministic estimate is returned
/// directly -- an explicit bypass, not an error path. Otherwise the model
/// is called and its output recovered; any failure along the way (HTTP
/// error, timeout, non-text response, unparseable or invariant-violating
/// JSON) degrades to the deterministic estimate.
pub async fn generate_proposal(client: Option<&LlmClient>, input: &ProposalInput) -> ProposalOutput {
    let Some(client) = client else {
        tracing::debug!("no text-generation credential configured, using deterministic estimate");
        return fallback_proposal(input);
    };

    let prompts = build_prompts(input);

    let text = match client.complete(&prompts.system, &prompts.user).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "text-generation call failed, using deterministic estimate");
            return fallback_proposal(input);
        }
    };

    match parse_proposal_output(&text) {
        Some(output) => output,
        None => {
            tracing::warn!(
                response_len = text.len(),
                "model response could not be recovered into a proposal, using deterministic estimate",
            );
            fallback_proposal(input)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
