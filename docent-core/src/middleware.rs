//! Request interception: the single seam where skill policy enters a model call
//!
//! [`SkillMiddleware::intercept`] takes the outgoing request and the downstream
//! call as explicit arguments. It swaps in an augmented system message, calls
//! `next` exactly once and hands back whatever `next` returned, errors
//! included. Neither the orchestrator nor the provider knows skills exist.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::llm::{ModelRequest, ModelResponse};
use crate::skills::{SkillRegistry, skills_addendum};

/// Injects the "Available Skills" block into every outgoing request
#[derive(Debug, Clone)]
pub struct SkillMiddleware {
    registry: Arc<SkillRegistry>,
    addendum: String,
}

impl SkillMiddleware {
    /// Create the middleware; the skills block is rendered once here.
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        let addendum = skills_addendum(&registry);
        Self { registry, addendum }
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    /// `base` with the skills block appended
    pub fn augment(&self, base: &str) -> String {
        let mut augmented = String::with_capacity(base.len() + self.addendum.len());
        augmented.push_str(base);
        augmented.push_str(&self.addendum);
        augmented
    }

    /// Copy of `request` whose system message carries the skills block.
    /// Messages, tools and generation parameters are untouched.
    pub fn modify_request(&self, request: &ModelRequest) -> ModelRequest {
        request.override_system_message(self.augment(&request.system_message))
    }

    /// Augment `request` and forward it to `next`, returning its result verbatim.
    ///
    /// `request` must carry the original system message. Errors from `next`
    /// are neither transformed nor retried.
    pub async fn intercept<F, Fut>(&self, request: ModelRequest, next: F) -> Result<ModelResponse>
    where
        F: FnOnce(ModelRequest) -> Fut,
        Fut: Future<Output = Result<ModelResponse>>,
    {
        let modified = self.modify_request(&request);
        tracing::trace!(
            skills = self.registry.len(),
            system_len = modified.system_message.len(),
            "Injected skills into system message"
        );
        next(modified).await
    }
}
