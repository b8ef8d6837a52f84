//! Conversation orchestrator
//!
//! [`SkillAgent`] drives one turn of a thread through the states
//!
//! ```text
//! AwaitingUserInput -> ModelCall -> { ToolDispatch -> ModelCall }* -> Done
//! ```
//!
//! Every model call goes through the [`SkillMiddleware`], so the model always
//! sees the skills list. Tool calls are dispatched sequentially in the order
//! requested, each result appended right after the assistant message that
//! asked for it. The turn is committed to the [`ThreadStore`] only once it
//! reaches `Done`; a turn that fails leaves the stored history untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use docent_core::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let agent = SkillAgent::from_config(DocentConfig::load()?)?;
//! let thread = ThreadId::new();
//!
//! let history = agent
//!     .invoke(&thread, "Which customers spent over $1000 last month?")
//!     .await?;
//! for message in &history {
//!     println!("{}: {}", message.role, message.content);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::DocentConfig;
use crate::conversation::{InMemoryThreadStore, ThreadId, ThreadStore};
use crate::error::{DocentError, Result};
use crate::llm::{
    LLMProvider, LLMProviderFactory, Message, ModelRequest, ModelResponse, TokenUsage, ToolCall,
    ToolDefinition,
};
use crate::middleware::SkillMiddleware;
use crate::skills::{FileSkillStore, SkillContentStore, SkillLoader, SkillRegistry};
use crate::tools::{LoadSkillTool, Tool, ToolRegistry};

/// Orchestration state of a single turn
#[derive(Debug)]
enum TurnState {
    AwaitingUserInput(String),
    ModelCall,
    ToolDispatch(Vec<ToolCall>),
    Done(Message),
}

/// Result of one completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Thread the turn ran on
    pub thread_id: ThreadId,

    /// Messages added by this turn, starting with the user message
    pub messages: Vec<Message>,

    /// Final assistant message (the one without tool calls)
    pub final_answer: Message,

    /// Number of model calls made
    pub iterations: usize,

    /// Token usage summed over all model calls that reported it
    pub usage: TokenUsage,
}

/// Agent that answers user messages with on-demand skill loading.
pub struct SkillAgent {
    config: Arc<DocentConfig>,
    provider: Arc<dyn LLMProvider>,
    middleware: SkillMiddleware,
    tools: ToolRegistry,
    tool_definitions: Vec<ToolDefinition>,
    store: Arc<dyn ThreadStore>,
    thread_locks: std::sync::Mutex<HashMap<ThreadId, Arc<tokio::sync::Mutex<()>>>>,
}

impl std::fmt::Debug for SkillAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillAgent")
            .field("model", &self.provider.model_info().model_name)
            .field("skills", &self.middleware.registry().names())
            .field("tools", &self.tools.names())
            .finish()
    }
}

impl SkillAgent {
    /// Create a new agent builder
    pub fn builder() -> SkillAgentBuilder {
        SkillAgentBuilder::new()
    }

    /// Build an agent entirely from configuration, creating the LLM provider
    /// through [`LLMProviderFactory`].
    pub fn from_config(config: DocentConfig) -> Result<Self> {
        let provider = LLMProviderFactory::create(&config.llm)?;
        Self::builder().config(config).llm_provider(provider).build()
    }

    pub fn config(&self) -> &DocentConfig {
        &self.config
    }

    /// Registry of skills advertised to the model
    pub fn skills(&self) -> &SkillRegistry {
        self.middleware.registry()
    }

    /// Tools the model may call
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Full stored history of a thread
    pub async fn history(&self, thread_id: &ThreadId) -> Result<Vec<Message>> {
        self.store.history(thread_id).await
    }

    /// Run one turn and return the thread's full history as of the end of
    /// that turn.
    pub async fn invoke(
        &self,
        thread_id: &ThreadId,
        user_message: impl Into<String>,
    ) -> Result<Vec<Message>> {
        let (_, history) = self
            .run_turn(thread_id, user_message.into(), CancellationToken::new())
            .await?;
        Ok(history)
    }

    /// Run one turn and return what it added.
    pub async fn invoke_turn(
        &self,
        thread_id: &ThreadId,
        user_message: impl Into<String>,
    ) -> Result<TurnOutcome> {
        self.invoke_turn_with_cancellation(thread_id, user_message, CancellationToken::new())
            .await
    }

    /// Run one turn that stops with [`DocentError::Cancelled`] as soon as
    /// `cancel` fires, whether waiting on the model or dispatching tools.
    /// A token that is already cancelled stops the turn before any model call.
    pub async fn invoke_turn_with_cancellation(
        &self,
        thread_id: &ThreadId,
        user_message: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<TurnOutcome> {
        let (outcome, _) = self.run_turn(thread_id, user_message.into(), cancel).await?;
        Ok(outcome)
    }

    /// Serialize on the thread's lock, run the turn, then drop the lock entry
    /// if no other turn is waiting on it.
    async fn run_turn(
        &self,
        thread_id: &ThreadId,
        user_message: String,
        cancel: CancellationToken,
    ) -> Result<(TurnOutcome, Vec<Message>)> {
        let lock = self.thread_lock(thread_id);
        let result = {
            let _guard = lock.lock().await;
            self.run_locked_turn(thread_id, user_message, &cancel).await
        };
        self.release_thread_lock(thread_id, lock);
        result
    }

    /// Returns the outcome and the thread's full history after the commit.
    async fn run_locked_turn(
        &self,
        thread_id: &ThreadId,
        user_message: String,
        cancel: &CancellationToken,
    ) -> Result<(TurnOutcome, Vec<Message>)> {
        let mut history = self.store.history(thread_id).await?;
        let turn_start = history.len();
        let max_iterations = self.config.agent.max_iterations;
        let mut iterations = 0usize;
        let mut usage = TokenUsage::default();

        tracing::info!(thread_id = %thread_id, prior_messages = turn_start, "Starting turn");

        let mut state = TurnState::AwaitingUserInput(user_message);
        let final_answer = loop {
            state = match state {
                TurnState::AwaitingUserInput(text) => {
                    history.push(Message::user(text));
                    TurnState::ModelCall
                }
                TurnState::ModelCall => {
                    if cancel.is_cancelled() {
                        tracing::info!(
                            thread_id = %thread_id,
                            iteration = iterations,
                            "Turn cancelled"
                        );
                        return Err(DocentError::Cancelled);
                    }
                    if iterations >= max_iterations {
                        tracing::warn!(
                            thread_id = %thread_id,
                            limit = max_iterations,
                            "Tool-call loop limit reached"
                        );
                        return Err(DocentError::LoopLimitExceeded {
                            limit: max_iterations,
                        });
                    }
                    iterations += 1;

                    let response = self.call_model(&history, cancel).await?;
                    if let Some(reported) = &response.usage {
                        usage.add(reported);
                    }

                    let message = response.message;
                    tracing::debug!(
                        thread_id = %thread_id,
                        iteration = iterations,
                        tool_calls = message.tool_calls.len(),
                        "Model responded"
                    );

                    if message.has_tool_calls() {
                        let calls = message.tool_calls.clone();
                        history.push(message);
                        TurnState::ToolDispatch(calls)
                    } else {
                        history.push(message.clone());
                        TurnState::Done(message)
                    }
                }
                TurnState::ToolDispatch(calls) => {
                    for call in &calls {
                        tracing::info!(
                            thread_id = %thread_id,
                            tool = %call.name,
                            call_id = %call.id,
                            "Dispatching tool call"
                        );
                        let result = tokio::select! {
                            biased;
                            _ = cancel.cancelled() => return Err(DocentError::Cancelled),
                            result = self.tools.dispatch(call) => result,
                        };
                        history.push(result);
                    }
                    TurnState::ModelCall
                }
                TurnState::Done(answer) => break answer,
            };
        };

        let messages = history.split_off(turn_start);
        self.store.append(thread_id, &messages).await?;
        history.extend_from_slice(&messages);

        tracing::info!(
            thread_id = %thread_id,
            iterations,
            messages = messages.len(),
            total_tokens = usage.total_tokens,
            "Turn completed"
        );

        let outcome = TurnOutcome {
            thread_id: *thread_id,
            messages,
            final_answer,
            iterations,
            usage,
        };
        Ok((outcome, history))
    }

    /// One model call through the interception layer, bounded by the
    /// configured timeout and the cancellation token.
    async fn call_model(
        &self,
        history: &[Message],
        cancel: &CancellationToken,
    ) -> Result<ModelResponse> {
        let mut request = ModelRequest::new(self.config.system_prompt.clone(), history.to_vec())
            .with_tools(self.tool_definitions.clone());
        if let Some(temperature) = self.config.llm.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.llm.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let provider = &self.provider;
        let call = self
            .middleware
            .intercept(request, move |req| async move { provider.complete(&req).await });

        let timeout = self.config.agent.model_call_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DocentError::Cancelled),
            result = tokio::time::timeout(timeout, call) => match result {
                Ok(response) => response,
                Err(_) => Err(DocentError::Timeout(timeout)),
            },
        }
    }

    fn thread_lock(&self, thread_id: &ThreadId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .thread_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(*thread_id).or_default().clone()
    }

    fn release_thread_lock(&self, thread_id: &ThreadId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .thread_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only the map and `lock` still reference it: no turn is queued.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(thread_id);
        }
    }

    /// Number of threads with a turn running or queued
    pub fn active_threads(&self) -> usize {
        self.thread_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Builder for [`SkillAgent`]
pub struct SkillAgentBuilder {
    config: DocentConfig,
    provider: Option<Arc<dyn LLMProvider>>,
    registry: Option<Arc<SkillRegistry>>,
    skill_store: Option<Arc<dyn SkillContentStore>>,
    thread_store: Option<Arc<dyn ThreadStore>>,
    extra_tools: Vec<Arc<dyn Tool>>,
}

impl SkillAgentBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: DocentConfig::default(),
            provider: None,
            registry: None,
            skill_store: None,
            thread_store: None,
            extra_tools: Vec::new(),
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: DocentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the maximum number of model calls per turn
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.agent.max_iterations = max_iterations;
        self
    }

    /// Set the per-call model timeout
    pub fn model_call_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.agent.model_call_timeout = timeout;
        self
    }

    /// Set the LLM provider (required)
    pub fn llm_provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use this skill registry instead of the configured one
    pub fn skill_registry(mut self, registry: SkillRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Use this content store instead of `<skills.dir>/<name>.md` files
    pub fn skill_store(mut self, store: Arc<dyn SkillContentStore>) -> Self {
        self.skill_store = Some(store);
        self
    }

    /// Use this thread store instead of a fresh in-memory one
    pub fn thread_store(mut self, store: Arc<dyn ThreadStore>) -> Self {
        self.thread_store = Some(store);
        self
    }

    /// Expose an additional tool to the model
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.extra_tools.push(tool);
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<SkillAgent> {
        self.config.validate()?;

        let provider = self.provider.ok_or_else(|| {
            DocentError::Configuration("SkillAgent requires an LLM provider".to_string())
        })?;

        let registry = match self.registry {
            Some(registry) => registry,
            None if self.config.skills.discover => {
                Arc::new(SkillRegistry::discover(&self.config.skills.dir)?)
            }
            None => Arc::new(SkillRegistry::builtin()),
        };

        let skill_store = self
            .skill_store
            .unwrap_or_else(|| Arc::new(FileSkillStore::new(self.config.skills.dir.clone())));
        let loader = Arc::new(SkillLoader::with_policy(
            registry.clone(),
            skill_store,
            self.config.skills.cache,
        ));

        let mut tools = ToolRegistry::new();
        let registration = std::iter::once(Arc::new(LoadSkillTool::new(loader)) as Arc<dyn Tool>)
            .chain(self.extra_tools)
            .try_for_each(|tool| tools.register(tool));
        registration.map_err(|e| DocentError::Configuration(e.to_string()))?;
        let tool_definitions = tools.definitions();

        let store = self
            .thread_store
            .unwrap_or_else(|| Arc::new(InMemoryThreadStore::new()));

        tracing::debug!(
            skills = registry.len(),
            tools = tools.len(),
            model = %provider.model_info().model_name,
            "Built skill agent"
        );

        Ok(SkillAgent {
            config: Arc::new(self.config),
            provider,
            middleware: SkillMiddleware::new(registry),
            tools,
            tool_definitions,
            store,
            thread_locks: std::sync::Mutex::new(HashMap::new()),
        })
    }
}

impl Default for SkillAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
