use crate::error::{UsageError, UsagePolicy};
use crate::runner::signal::Signal;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Default)]
struct ContextState {
    logs: Vec<String>,
    failed: bool,
    done: bool,
}

/// 测试代码拿到的句柄，用来记录日志、标记失败或跳过
///
/// 每次执行都会新建一个上下文，只属于正在执行的那个测试。句柄可以廉价 clone，
/// 方便交给测试里启动的异步回调；测试结束后任何修改操作都是 [`UsageError`]，
/// 按 [`UsagePolicy`] 处理，不会被当成测试失败。
#[derive(Clone)]
pub struct TestContext {
    name: Rc<str>,
    state: Rc<RefCell<ContextState>>,
    policy: UsagePolicy,
}

impl TestContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, UsagePolicy::default())
    }

    pub fn with_policy(name: impl Into<String>, policy: UsagePolicy) -> Self {
        let name: String = name.into();
        Self {
            name: Rc::from(name),
            state: Rc::new(RefCell::new(ContextState::default())),
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_failed(&self) -> bool {
        self.state.borrow().failed
    }

    pub fn is_done(&self) -> bool {
        self.state.borrow().done
    }

    /// 当前日志的快照
    pub fn logs(&self) -> Vec<String> {
        self.state.borrow().logs.clone()
    }

    /// 记录一行日志
    pub fn log(&self, message: impl fmt::Display) {
        self.assert_not_done("log");
        self.push_log(message.to_string());
    }

    /// 等价于 `log` 后接 `fail`
    pub fn error(&self, message: impl fmt::Display) {
        self.assert_not_done("error");
        self.push_log(message.to_string());
        self.state.borrow_mut().failed = true;
    }

    /// 等价于 `log` 后接 `fail_now`
    ///
    /// 总是返回 `Err`，用 `?` 结束测试函数：
    ///
    /// ```ignore
    /// t.fatal("connection refused")?;
    /// ```
    pub fn fatal(&self, message: impl fmt::Display) -> Result<(), Signal> {
        self.assert_not_done("fatal");
        self.push_log(message.to_string());
        self.state.borrow_mut().failed = true;
        Err(Signal::Failed)
    }

    /// 标记失败但继续执行
    pub fn fail(&self) {
        self.assert_not_done("fail");
        self.state.borrow_mut().failed = true;
    }

    /// 标记失败并立即停止，总是返回 `Err`
    pub fn fail_now(&self) -> Result<(), Signal> {
        self.assert_not_done("fail_now");
        self.state.borrow_mut().failed = true;
        Err(Signal::Failed)
    }

    /// 跳过当前测试，不会设置失败标记，总是返回 `Err`
    pub fn skip(&self) -> Result<(), Signal> {
        self.assert_not_done("skip");
        Err(Signal::Skipped)
    }

    /// 记录意外错误：写日志并标记失败，不检查 done（由执行方在收尾前调用）
    pub(crate) fn record_unexpected(&self, message: String) {
        let mut state = self.state.borrow_mut();
        state.logs.push(message);
        state.failed = true;
    }

    /// 标记测试结束，之后上下文只读
    pub(crate) fn finish(&self) {
        self.state.borrow_mut().done = true;
    }

    fn push_log(&self, line: String) {
        self.state.borrow_mut().logs.push(line);
    }

    fn assert_not_done(&self, method: &'static str) {
        if self.is_done() {
            self.policy.raise(UsageError::ContextFinished {
                method,
                test: self.name.to_string(),
            });
        }
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TestContext")
            .field("name", &self.name)
            .field("logs", &state.logs)
            .field("failed", &state.failed)
            .field("done", &state.done)
            .finish()
    }
}
