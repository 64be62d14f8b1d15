use crate::rpc::{Outcome, RpcCall, classify_correlated};
use tokio::time::Instant;
use tracing::{debug, error, instrument, warn};

use super::Dispatcher;

impl Dispatcher {
    /// Runs attempts until a terminal outcome, the retry budget, or the deadline.
    ///
    /// A retry is skipped when its backoff would end past `deadline`; the
    /// last transport error is returned instead. `None` means no deadline.
    pub(crate) async fn execute_with_retry(
        &self,
        call: &RpcCall,
        max_retries: u32,
        deadline: Option<Instant>,
    ) -> Outcome {
        let retry_safe = call.is_retry_safe();
        let mut attempt: u32 = 0;

        loop {
            let outcome = self.attempt(call, attempt + 1, deadline).await;
            if !matches!(outcome, Outcome::TransportError(_)) {
                debug!(attempt = attempt + 1, outcome = outcome.label(), "Dispatch finished");
                return outcome;
            }

            let next = attempt + 1;
            if !self
                .retry_strategy()
                .should_retry(&outcome, next, max_retries, retry_safe)
            {
                error!(
                    attempt = attempt + 1,
                    outcome = %outcome,
                    retry_safe,
                    "Attempt failed, not retrying"
                );
                return outcome;
            }

            let delay = self.retry_strategy().calculate_delay(next);
            if let Some(deadline) = deadline
                && Instant::now()
                    .checked_add(delay)
                    .is_none_or(|end| end >= deadline)
            {
                warn!(
                    attempt = attempt + 1,
                    delay_ms = %delay.as_millis(),
                    outcome = %outcome,
                    "Backoff would pass the dispatch deadline, not retrying"
                );
                return outcome;
            }

            warn!(
                attempt = attempt + 1,
                delay_ms = %delay.as_millis(),
                outcome = %outcome,
                "Attempt failed, retrying after delay"
            );
            tokio::time::sleep(delay).await;
            attempt = next;
        }
    }

    /// One attempt: take a pool slot, send with the time left until
    /// `deadline`, classify. The slot is released on return or when the
    /// future is dropped.
    #[instrument(
        name = "rpc_attempt",
        skip(self, call),
        fields(method = %call.method(), id = %call.id())
    )]
    async fn attempt(&self, call: &RpcCall, attempt: u32, deadline: Option<Instant>) -> Outcome {
        let _slot = match self.pool().acquire().await {
            Ok(slot) => slot,
            Err(err) => return Outcome::TransportError(err),
        };
        let remaining = deadline.map(|end| end.saturating_duration_since(Instant::now()));
        let raw = self.transport().send(call, remaining).await;
        classify_correlated(raw, call.id())
    }
}
