use crate::Result;
use crate::runner::types::{Outcome, TestResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// 报告格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// 单个 JSON 数组，每个元素为 `{name, stat, logs}`
    Json,
    /// 每个测试一行，失败的测试附带缩进的日志
    #[default]
    Pretty,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Pretty => "pretty",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 把结果按输入顺序渲染为文本，不带结尾换行
pub fn render(results: &[TestResult], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string(results)?),
        ReportFormat::Pretty => Ok(render_pretty(results)),
    }
}

fn render_pretty(results: &[TestResult]) -> String {
    let mut lines = Vec::new();

    for result in results {
        lines.push(format!("[{}] {}", result.outcome, result.name));

        // 只有失败的测试才展示日志
        if result.outcome == Outcome::Fail {
            for log in &result.logs {
                lines.push(format!("  {}", log));
            }
        }
    }

    lines.join("\n")
}

pub struct TestReporter {
    format: ReportFormat,
}

impl TestReporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn render(&self, results: &[TestResult]) -> Result<String> {
        render(results, self.format)
    }

    /// 渲染并写出报告
    pub fn write_to<W: Write>(&self, writer: &mut W, results: &[TestResult]) -> Result<()> {
        let rendered = self.render(results)?;
        writeln!(writer, "{}", rendered)?;
        writer.flush()?;
        Ok(())
    }

    /// 打印到 stdout
    pub fn print(&self, results: &[TestResult]) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle, results)
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(ReportFormat::default())
    }
}
