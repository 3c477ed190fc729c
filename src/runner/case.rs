use crate::error::UsageError;
use crate::runner::context::TestContext;
use crate::runner::signal::{Completion, Signal};
use crate::runner::types::{Outcome, TestResult};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use tracing::{debug, warn};

/// 测试函数的返回类型
pub type TestFnResult = anyhow::Result<()>;

/// 类型擦除后的测试函数
pub type TestFn = Rc<dyn Fn(TestContext) -> LocalBoxFuture<'static, TestFnResult>>;

/// 把一个 async 闭包装箱为 [`TestFn`]
pub fn boxed<F, Fut>(f: F) -> TestFn
where
    F: Fn(TestContext) -> Fut + 'static,
    Fut: Future<Output = TestFnResult> + 'static,
{
    Rc::new(move |t: TestContext| f(t).boxed_local())
}

/// 一次执行的产物：结构化结果，以及测试函数是怎样结束的
#[derive(Debug, Clone)]
pub struct TestRun {
    pub result: TestResult,
    pub completion: Completion,
}

/// 名称与测试函数的绑定，注册后不可变
#[derive(Clone)]
pub struct TestCase {
    name: String,
    func: TestFn,
}

impl TestCase {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + 'static,
        Fut: Future<Output = TestFnResult> + 'static,
    {
        Self::from_fn(name, boxed(f))
    }

    pub fn from_fn(name: impl Into<String>, func: TestFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 用给定的上下文执行测试函数，并把终态归类为结果
    ///
    /// - 正常返回：若期间调用过 `fail`/`error` 则为 Fail，否则 Pass
    /// - `Signal::Failed`：Fail
    /// - `Signal::Skipped`：Skip，即使之前已经标记失败
    /// - 其他错误或 panic：记录其字符串形式并标记失败，结果为 Fail，
    ///   终态为 `Aborted(Signal::Unexpected)`
    /// - 以 [`UsageError`] 为 payload 的 panic 不归类，原样继续展开
    ///
    /// 无论哪种终态，返回前上下文都被标记为 done。
    pub async fn run(&self, context: TestContext) -> TestRun {
        debug!(test = %self.name, "Starting test");

        let outcome = AssertUnwindSafe((self.func)(context.clone()))
            .catch_unwind()
            .await;

        let completion = match outcome {
            Ok(Ok(())) => Completion::Returned,
            Ok(Err(err)) => match err.downcast_ref::<Signal>() {
                Some(Signal::Failed) => Completion::Aborted(Signal::Failed),
                Some(Signal::Skipped) => Completion::Aborted(Signal::Skipped),
                Some(Signal::Unexpected) | None => {
                    context.record_unexpected(format!("{:#}", err));
                    Completion::Aborted(Signal::Unexpected)
                }
            },
            // 误用不是这个测试的结果，继续向外展开
            Err(payload) if payload.is::<UsageError>() => {
                context.finish();
                std::panic::resume_unwind(payload)
            }
            Err(payload) => {
                context.record_unexpected(panic_message(payload.as_ref()));
                Completion::Aborted(Signal::Unexpected)
            }
        };
        context.finish();

        let outcome = match completion {
            Completion::Aborted(Signal::Skipped) => Outcome::Skip,
            Completion::Aborted(_) => Outcome::Fail,
            Completion::Returned if context.is_failed() => Outcome::Fail,
            Completion::Returned => Outcome::Pass,
        };

        if completion.is_unexpected() {
            warn!(test = %self.name, "Test raised an unexpected error");
        }
        debug!(test = %self.name, %outcome, %completion, "Finished test");

        TestRun {
            result: TestResult::new(self.name.clone(), outcome, context.logs()),
            completion,
        }
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked: <non-string payload>".to_string()
    }
}
