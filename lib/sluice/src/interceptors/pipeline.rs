//! Typed response pipeline.
//!
//! Response stages are chained with [`ResponsePipeline::then`]: the output type
//! of one stage is the input type of the next, so a stage that extracts a
//! payload can only be followed by stages that accept that payload.

use std::fmt;
use std::sync::Arc;

use sluice_core::{BoxFuture, StageResult};

type StageFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, StageResult<O>> + Send + Sync>;

/// Ordered chain of asynchronous response stages from `I` to `O`.
///
/// Each stage is awaited before the next one starts. A stage returning `Err`
/// stops the chain; the remaining stages never run.
pub struct ResponsePipeline<I, O> {
    run: StageFn<I, O>,
    len: usize,
}

impl<I, O> Clone for ResponsePipeline<I, O> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            len: self.len,
        }
    }
}

impl<I, O> fmt::Debug for ResponsePipeline<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsePipeline")
            .field("stages", &self.len)
            .finish()
    }
}

impl<I, O> ResponsePipeline<I, O> {
    /// Number of stages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no stage was added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<I: Send + 'static> ResponsePipeline<I, I> {
    /// An empty pipeline, returning its input unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run: Arc::new(|input: I| -> BoxFuture<'static, StageResult<I>> {
                Box::pin(async move { Ok(input) })
            }),
            len: 0,
        }
    }
}

impl<I: Send + 'static> Default for ResponsePipeline<I, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Send + 'static, O: Send + 'static> ResponsePipeline<I, O> {
    /// Append a stage consuming this pipeline's output.
    #[must_use]
    pub fn then<N, F, Fut>(self, stage: F) -> ResponsePipeline<I, N>
    where
        N: Send + 'static,
        F: Fn(O) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StageResult<N>> + Send + 'static,
    {
        let prev = self.run;
        let stage = Arc::new(stage);
        let run: StageFn<I, N> = Arc::new(move |input: I| -> BoxFuture<'static, StageResult<N>> {
            let pending = prev(input);
            let stage = Arc::clone(&stage);
            Box::pin(async move {
                let value = pending.await?;
                stage(value).await
            })
        });

        ResponsePipeline {
            run,
            len: self.len + 1,
        }
    }

    /// Run every stage in order.
    pub fn run(&self, input: I) -> BoxFuture<'static, StageResult<O>> {
        (self.run)(input)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use sluice_core::{Failure, NormalizedError};

    use super::*;

    fn stage_count<I, O>(pipeline: &ResponsePipeline<I, O>) -> usize {
        pipeline.len()
    }

    #[test]
    fn len_needs_no_bounds() {
        let pipeline = ResponsePipeline::<u32, u32>::new().then(|n: u32| async move { Ok(n) });
        assert_eq!(stage_count(&pipeline), 1);
        assert_eq!(format!("{pipeline:?}"), "ResponsePipeline { stages: 1 }");
    }

    #[tokio::test]
    async fn empty_pipeline_is_identity() {
        let pipeline = ResponsePipeline::<u32, u32>::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run(7).await.expect("identity"), 7);
    }

    #[tokio::test]
    async fn stages_change_type_in_order() {
        let pipeline = ResponsePipeline::<u32, u32>::new()
            .then(|n: u32| async move { Ok(n + 1) })
            .then(|n: u32| async move { Ok(format!("#{n}")) })
            .then(|s: String| async move { Ok(s.len()) });

        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline.run(41).await.expect("chain"), 3);
    }

    #[tokio::test]
    async fn failure_skips_remaining_stages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&seen);
        let last = Arc::clone(&seen);

        let pipeline = ResponsePipeline::<u32, u32>::new()
            .then(move |n: u32| {
                first.lock().expect("lock").push("first");
                async move {
                    if n == 0 {
                        Err(Failure::from(NormalizedError::new(500, "Request failed")))
                    } else {
                        Ok(n)
                    }
                }
            })
            .then(move |n: u32| {
                last.lock().expect("lock").push("last");
                async move { Ok(n) }
            });

        let failure = pipeline.run(0).await.expect_err("first stage rejects");
        assert_eq!(failure.status(), Some(500));
        assert_eq!(*seen.lock().expect("lock"), vec!["first"]);
    }
}
