use crate::runner::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// 测试进程可识别的参数
///
/// 测试程序往往还会收到其他参数，未知参数一律忽略。
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(author, about, long_about = None, disable_help_flag = true, args_override_self = true)]
pub struct Cli {
    /// 报告格式（json 或 pretty），默认 pretty
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// 不再提示隐式使用全局测试套件
    #[arg(long)]
    pub global: bool,

    /// 指定配置文件，而不是自动查找 rutest.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// 解析当前进程的参数，解析失败时使用默认值
    pub fn from_env() -> Self {
        Self::from_args(std::env::args())
    }

    /// 逐个校验认识的参数，值非法的参数单独丢弃，不影响其他参数
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (program, groups) = known_args(args);

        let mut kept = vec![program.clone()];
        for group in groups {
            let candidate = std::iter::once(program.clone()).chain(group.iter().cloned());
            match Self::try_parse_from(candidate) {
                Ok(_) => kept.extend(group),
                Err(e) => tracing::debug!("Ignoring argument {}: {}", group.join(" "), e),
            }
        }

        Self::try_parse_from(kept).unwrap_or_else(|e| {
            tracing::debug!("Falling back to default arguments: {}", e);
            Self::default()
        })
    }
}

/// 只保留本工具认识的参数，每个参数连同它的值成一组，其余的交给别的程序处理
fn known_args<I, T>(args: I) -> (String, Vec<Vec<String>>)
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut args = args.into_iter().map(Into::<String>::into);
    let program = args.next().unwrap_or_else(|| "rutest".to_string());
    let mut groups = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--format" || arg == "--config" {
            let mut group = vec![arg];
            group.extend(args.next());
            groups.push(group);
        } else if arg == "--global" || arg.starts_with("--format=") || arg.starts_with("--config=")
        {
            groups.push(vec![arg]);
        }
    }

    (program, groups)
}
