use std::fmt;

/// 测试函数提前终止时携带的控制信号
///
/// `TestContext::fatal` / `fail_now` / `skip` 返回 `Err(Signal)`，测试代码用 `?`
/// 把它一路传回 [`TestCase::run`](super::TestCase::run)。在那里按变体（而不是按
/// 错误类型）区分"主动停止"和"测试代码里冒出来的意外错误"，信号不会再往上泄漏。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Signal {
    /// 测试标记失败并立即停止
    #[error("test aborted: failed")]
    Failed,
    /// 测试被主动跳过
    #[error("test aborted: skipped")]
    Skipped,
    /// 意外错误已被记录到日志后重新发出，避免上层重复报告
    #[error("test aborted: unexpected error")]
    Unexpected,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Failed => "failed",
            Signal::Skipped => "skipped",
            Signal::Unexpected => "unexpected",
        }
    }
}

/// 测试函数执行的终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// 正常返回
    Returned,
    /// 通过信号提前终止
    Aborted(Signal),
}

impl Completion {
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Completion::Aborted(Signal::Unexpected))
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Returned => write!(f, "returned"),
            Completion::Aborted(signal) => write!(f, "aborted ({})", signal.as_str()),
        }
    }
}
