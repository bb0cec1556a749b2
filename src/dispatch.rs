//! Call boundary shared by every transport.
//!
//! [`Dispatcher::call`] always answers: successes and failures both come
//! back as a [`CallReply`] holding one text payload. Each call runs in its
//! own task, so a panic inside a tool surfaces as a join error and is
//! rendered as a generic apology instead of taking the process down.

use std::sync::Arc;

use flight_core::{CallError, DataMode, FlightError, SyntheticGenerator};
use serde_json::Value;

use crate::config::Config;
use crate::probe::ProbeOutcome;
use crate::render;
use crate::tools::{ToolContext, ToolInfo, ToolRegistry};

/// Outcome of one dispatched call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReply {
    pub text: String,
    pub is_error: bool,
    /// Machine-readable error code; `None` on success.
    pub code: Option<&'static str>,
}

impl CallReply {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
            code: None,
        }
    }

    fn failed(err: &CallError, ctx: &ToolContext) -> Self {
        Self {
            text: render::error(err, ctx.line_break()),
            is_error: true,
            code: Some(err.code()),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    ctx: Arc<ToolContext>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, ctx: Arc<ToolContext>) -> Self {
        Self { registry, ctx }
    }

    /// Dispatcher over the built-in tools for a decided mode.
    pub fn from_config(config: &Config, outcome: ProbeOutcome) -> Self {
        let currency = config.provider.currency.clone();
        let generator = match config.fallback.seed {
            Some(seed) => SyntheticGenerator::seeded(seed, currency),
            None => SyntheticGenerator::from_entropy(currency),
        };
        let ctx = ToolContext::new(
            outcome.provider,
            Arc::new(generator),
            config.output.line_break,
        );
        Self::new(Arc::new(ToolRegistry::with_builtins()), Arc::new(ctx))
    }

    pub fn mode(&self) -> DataMode {
        self.ctx.mode()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.find(name).is_some()
    }

    pub fn tools(&self) -> Vec<ToolInfo> {
        self.registry
            .tools()
            .iter()
            .map(|t| ToolInfo::of(t.as_ref()))
            .collect()
    }

    /// Run one named operation. A non-object `args` is treated as empty.
    pub async fn call(&self, name: &str, args: Value) -> CallReply {
        let args = match args {
            Value::Object(_) => args,
            _ => Value::Object(serde_json::Map::new()),
        };
        tracing::debug!(tool = name, mode = %self.mode(), "tool call");

        if !self.has_tool(name) {
            let err = CallError::from(FlightError::GeneralError {
                message: format!("Unknown tool: {}", name),
            });
            return CallReply::failed(&err, &self.ctx);
        }

        let registry = self.registry.clone();
        let ctx = self.ctx.clone();
        let tool_name = name.to_string();
        let task = tokio::spawn(async move {
            match registry.find(&tool_name) {
                Some(tool) => tool.execute(args, &ctx).await,
                None => Err(CallError::Internal(format!("tool vanished: {}", tool_name))),
            }
        });

        let result = match task.await {
            Ok(result) => result,
            Err(join_err) => Err(CallError::Internal(join_err.to_string())),
        };

        match result {
            Ok(text) => CallReply::ok(text),
            Err(err) => {
                match &err {
                    CallError::Internal(detail) => {
                        tracing::error!(tool = name, detail = %detail, "tool call failed unexpectedly")
                    }
                    CallError::Domain(e) => {
                        tracing::warn!(tool = name, code = e.code(), error = %e, "tool call failed")
                    }
                    CallError::Validation(e) => {
                        tracing::debug!(tool = name, error = %e, "rejected arguments")
                    }
                }
                CallReply::failed(&err, &self.ctx)
            }
        }
    }
}
