use colored::Colorize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RutestError {
    #[error("使用错误: {0}")]
    Usage(#[from] UsageError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("调度任务失败: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for RutestError {
    fn from(err: anyhow::Error) -> Self {
        RutestError::Other(err.to_string())
    }
}

/// Result type for rutest crate
pub type Result<T> = std::result::Result<T, RutestError>;

/// 框架 API 的误用
///
/// 与测试本身的 pass/fail/skip 不同，这类错误说明调用方的测试代码有逻辑缺陷
/// （最常见的是漏掉了一个异步依赖），不能被当作测试结果记录下来。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error(
        "attempted to call {method} from test(\"{test}\") after the test had finished running. \
         This is likely because your test initiated an asynchronous operation but did not wait for it to complete."
    )]
    ContextFinished { method: &'static str, test: String },

    #[error("no tests to run")]
    EmptySuite,

    #[error(
        "refusing to register test: {0}\n\n\
         This test was registered after the global test suite started running. \
         This is likely because this test was registered asynchronously."
    )]
    LateRegistration(String),

    #[error("refusing to register test: {0}, the suite has already started running")]
    SuiteStarted(String),

    #[error(
        "cannot schedule the global test suite for test(\"{0}\"): test() must be called \
         inside a tokio LocalSet. Wrap your registrations in rutest::main(|| ...)."
    )]
    NoLocalSet(String),
}

/// 发生 [`UsageError`] 且调用方没有返回值可以承载它时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsagePolicy {
    /// 打印诊断信息后以非零状态码退出进程
    #[default]
    Exit,
    /// 以 [`UsageError`] 为 payload panic，框架自身的测试用它来观察误用。
    /// 测试函数内部触发时不会被当作该测试的失败吞掉，而是继续向外展开。
    Panic,
}

impl UsagePolicy {
    /// 终止当前执行流，永不返回
    pub fn raise(self, err: UsageError) -> ! {
        tracing::error!(error = %err, "usage error");
        match self {
            UsagePolicy::Exit => {
                eprintln!("{}: {}", "error".red().bold(), err);
                std::process::exit(1);
            }
            UsagePolicy::Panic => std::panic::panic_any(err),
        }
    }
}
