use crate::error::{UsageError, UsagePolicy};
use crate::runner::case::{TestCase, TestFnResult};
use crate::runner::context::TestContext;
use crate::runner::types::{TestResult, TestSummary};
use futures::future::join_all;
use std::future::Future;
use std::time::Instant;
use tracing::info;

/// 一组按注册顺序保存的测试
///
/// 注册阶段可变，`run` 开始后只读。所有测试在同一个线程上并发执行
/// （协作式调度，没有并发上限），结果按注册顺序返回，与完成顺序无关。
#[derive(Debug, Default)]
pub struct TestSuite {
    tests: Vec<TestCase>,
    started: bool,
    policy: UsagePolicy,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UsagePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// 通过回调定义一个测试套件
    ///
    /// ```ignore
    /// let mut suite = TestSuite::define(|s| {
    ///     s.test("adds", |t| async move {
    ///         if 1 + 1 != 2 {
    ///             t.error("math is broken");
    ///         }
    ///         Ok(())
    ///     });
    /// });
    /// let results = suite.run().await?;
    /// ```
    pub fn define(f: impl FnOnce(&mut TestSuite)) -> Self {
        let mut suite = Self::new();
        f(&mut suite);
        suite
    }

    pub fn policy(&self) -> UsagePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|t| t.name())
    }

    /// 注册一个测试，套件开始运行后再注册会返回错误
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, f: F) -> Result<(), UsageError>
    where
        F: Fn(TestContext) -> Fut + 'static,
        Fut: Future<Output = TestFnResult> + 'static,
    {
        self.push(TestCase::new(name, f))
    }

    /// 注册一个已构建的测试
    pub fn push(&mut self, case: TestCase) -> Result<(), UsageError> {
        if self.started {
            return Err(UsageError::SuiteStarted(case.name().to_string()));
        }
        self.tests.push(case);
        Ok(())
    }

    /// 链式注册，误用按套件的 [`UsagePolicy`] 处理
    pub fn test<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + 'static,
        Fut: Future<Output = TestFnResult> + 'static,
    {
        if let Err(err) = self.register(name, f) {
            self.policy.raise(err);
        }
        self
    }

    /// 并发执行所有测试，每个测试拿到全新的上下文
    ///
    /// 没有注册任何测试时返回 [`UsageError::EmptySuite`]，不产生任何结果。
    pub async fn run(&mut self) -> Result<Vec<TestResult>, UsageError> {
        if self.tests.is_empty() {
            return Err(UsageError::EmptySuite);
        }
        self.started = true;

        let start = Instant::now();
        let policy = self.policy;
        let runs = join_all(
            self.tests
                .iter()
                .map(|case| case.run(TestContext::with_policy(case.name(), policy))),
        )
        .await;

        let results: Vec<TestResult> = runs.into_iter().map(|run| run.result).collect();

        info!(
            "Suite completed in {}ms - {}",
            start.elapsed().as_millis(),
            TestSummary::from_results(&results)
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::types::Outcome;

    #[tokio::test]
    async fn test_empty_suite_is_usage_error() {
        let mut suite = TestSuite::new();
        assert_eq!(suite.run().await, Err(UsageError::EmptySuite));
    }

    #[tokio::test]
    async fn test_register_after_run_is_rejected() {
        let mut suite = TestSuite::new();
        suite.register("first", |_t| async { Ok(()) }).unwrap();
        suite.run().await.unwrap();

        let err = suite
            .register("second", |_t| async { Ok(()) })
            .unwrap_err();
        assert_eq!(err, UsageError::SuiteStarted("second".to_string()));
        assert_eq!(suite.len(), 1);
    }

    #[tokio::test]
    async fn test_define_registers_in_order() {
        let mut suite = TestSuite::define(|s| {
            s.test("a", |_t| async { Ok(()) })
                .test("b", |t| async move {
                    t.fail();
                    Ok(())
                });
        });
        assert_eq!(suite.names().collect::<Vec<_>>(), vec!["a", "b"]);

        let results = suite.run().await.unwrap();
        assert_eq!(results[0].outcome, Outcome::Pass);
        assert_eq!(results[1].outcome, Outcome::Fail);
    }

    #[tokio::test]
    async fn test_rerun_uses_fresh_contexts() {
        let mut suite = TestSuite::new();
        suite
            .register("logs once", |t| async move {
                t.log("hello");
                Ok(())
            })
            .unwrap();

        let first = suite.run().await.unwrap();
        let second = suite.run().await.unwrap();
        assert_eq!(first[0].logs, vec!["hello"]);
        assert_eq!(second[0].logs, vec!["hello"]);
    }
}
