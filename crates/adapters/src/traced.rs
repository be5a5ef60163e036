// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::process::{ProcessAdapter, ProcessContext, ProcessError, ProcessSpec};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessAdapter
#[derive(Clone)]
pub struct TracedProcess<P> {
    inner: P,
}

impl<P> TracedProcess<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: ProcessAdapter> ProcessAdapter for TracedProcess<P> {
    async fn run(&self, spec: ProcessSpec, ctx: ProcessContext) -> Result<(), ProcessError> {
        let program = spec.program.name().to_string();
        let timeout_ms = ctx.timeout().map(|t| t.as_millis() as u64);
        let user = spec.user.as_ref().map(|u| u.name.clone());
        async {
            tracing::info!(
                args = spec.args.len(),
                env_count = spec.env.len(),
                ?timeout_ms,
                ?user,
                "starting"
            );
            let start = std::time::Instant::now();
            let result = self.inner.run(spec, ctx).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "exited"),
                Err(e) if e.is_cancellation() => tracing::warn!(elapsed_ms, error = %e, "cancelled"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
            }
            result
        }
        .instrument(tracing::info_span!("process.run", program = %program))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
