use serde::{Deserialize, Serialize};
use std::fmt;

/// 测试的最终分类，一旦确定就不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::Skip => "skip",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单个测试的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// 测试名称
    pub name: String,

    /// 执行结论（JSON 中的字段名为 `stat`）
    #[serde(rename = "stat")]
    pub outcome: Outcome,

    /// 测试期间记录的日志，按写入顺序
    pub logs: Vec<String>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, outcome: Outcome, logs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            outcome,
            logs,
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    pub fn failed(&self) -> bool {
        self.outcome == Outcome::Fail
    }

    pub fn skipped(&self) -> bool {
        self.outcome == Outcome::Skip
    }
}

/// 测试摘要
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TestSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        let skipped = results.iter().filter(|r| r.skipped()).count();

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed - skipped,
            skipped,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped, {} total",
            self.passed, self.failed, self.skipped, self.total
        )
    }
}
