// ABOUTME: Concurrent fan-out helper and per-member outcome aggregation.
// ABOUTME: Every member is launched before any is awaited; failures never short-circuit.

use crate::api::ApiError;
use crate::diagnostics::{Diagnostics, Warning};
use futures::future::join_all;
use std::fmt::Display;
use std::future::Future;

/// One member of a batch that failed.
#[derive(Debug)]
pub struct MemberFailure<K> {
    pub member: K,
    pub error: ApiError,
}

/// Aggregated result of a fan-out.
#[derive(Debug)]
pub struct BatchOutcome<K> {
    pub succeeded: Vec<K>,
    pub failed: Vec<MemberFailure<K>>,
    /// Members that needed no call.
    pub skipped: Vec<K>,
}

impl<K> Default for BatchOutcome<K> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<K> BatchOutcome<K> {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of calls actually issued.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn with_skipped(mut self, skipped: Vec<K>) -> Self {
        self.skipped = skipped;
        self
    }
}

impl<K: Display> BatchOutcome<K> {
    /// Record each failed member as a non-fatal warning.
    pub fn report(&self, action: &str, diag: &mut Diagnostics) {
        for failure in &self.failed {
            diag.warn(Warning::partial_batch(format!(
                "{action} failed for {}: {}",
                failure.member, failure.error
            )));
        }
    }
}

/// Run `op` for every member concurrently and wait for all of them.
///
/// All futures are created up front and polled together, so ordering inside
/// the batch is unspecified. One member failing does not cancel the others.
pub async fn fan_out<K, F, Fut>(members: Vec<K>, op: F) -> BatchOutcome<K>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let op = &op;
    let settled = join_all(members.into_iter().map(|member| async move {
        let result = op(member.clone()).await;
        (member, result)
    }))
    .await;

    let mut outcome = BatchOutcome::default();
    for (member, result) in settled {
        match result {
            Ok(()) => outcome.succeeded.push(member),
            Err(error) => outcome.failed.push(MemberFailure { member, error }),
        }
    }
    outcome
}
