//! Bounded condition polling.

use std::time::Duration;

use super::driver::EditorPage;
use super::predicate::ReadinessPredicate;

/// Default delay between two predicate evaluations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A wait whose predicate never held before its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitTimedOut {
    /// Last evaluation failure, if the predicate could not even be evaluated.
    pub last_error: Option<String>,
}

impl WaitTimedOut {
    pub fn describe(&self, predicate: &ReadinessPredicate) -> String {
        match &self.last_error {
            Some(err) => format!("{predicate} (last evaluation error: {err})"),
            None => predicate.to_string(),
        }
    }
}

/// Polls `predicate` on `page` until it holds or `timeout` elapses.
///
/// Evaluation errors count as "not yet": pages being replaced mid-navigation
/// routinely reject scripts for a moment.
pub async fn wait_until<P: EditorPage>(
    page: &P,
    predicate: &ReadinessPredicate,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), WaitTimedOut> {
    let script = predicate.to_script();
    let mut last_error = None;
    let polling = async {
        loop {
            match page.evaluate(&script).await {
                Ok(value) if value.as_bool() == Some(true) => return,
                Ok(_) => {}
                Err(err) => {
                    log::debug!("readiness check for {predicate} failed: {err}");
                    last_error = Some(err.to_string());
                }
            }
            tokio::time::sleep(poll_interval).await;
        }
    };
    let outcome = tokio::time::timeout(timeout, polling).await;
    match outcome {
        Ok(()) => Ok(()),
        Err(_) => Err(WaitTimedOut { last_error }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Script;
    use crate::{RenderError, Result};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Becomes ready on the n-th evaluation; fails the first evaluation.
    struct CountingPage {
        ready_after: usize,
        calls: AtomicUsize,
    }

    impl EditorPage for CountingPage {
        async fn evaluate(&self, _script: &Script) -> Result<Value> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 1 {
                return Err(RenderError::browser("readiness", "Execution context was destroyed"));
            }
            Ok(Value::Bool(call >= self.ready_after))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_once_predicate_holds() {
        let page = CountingPage {
            ready_after: 3,
            calls: AtomicUsize::new(0),
        };
        let predicate = ReadinessPredicate::element("svg");
        let waited = wait_until(&page, &predicate, Duration::from_secs(5), DEFAULT_POLL_INTERVAL).await;
        assert_eq!(waited, Ok(()));
        assert_eq!(page.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_and_reports_last_error() {
        let page = CountingPage {
            ready_after: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let predicate = ReadinessPredicate::element("svg");
        let err = wait_until(&page, &predicate, Duration::from_secs(1), DEFAULT_POLL_INTERVAL)
            .await
            .unwrap_err();
        let described = err.describe(&predicate);
        assert!(described.starts_with("element `svg` to exist"));
        assert!(described.contains("Execution context was destroyed"));
        assert!(page.calls.load(Ordering::SeqCst) > 2);
    }

    #[tokio::test(start_paused = true)]
    async fn non_boolean_results_do_not_count_as_ready() {
        struct StringPage;
        impl EditorPage for StringPage {
            async fn evaluate(&self, _script: &Script) -> Result<Value> {
                Ok(Value::String("true".to_string()))
            }
        }
        let predicate = ReadinessPredicate::DocumentComplete;
        let err = wait_until(&StringPage, &predicate, Duration::from_millis(300), DEFAULT_POLL_INTERVAL)
            .await
            .unwrap_err();
        assert_eq!(err.last_error, None);
    }
}
