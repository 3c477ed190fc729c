use crate::cli::Cli;
use crate::error::{Result, RutestError, UsagePolicy};
use crate::runner::ReportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 运行配置
///
/// 优先级从低到高：默认值 → `rutest.toml` → 命令行参数。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 报告格式
    pub format: ReportFormat,

    /// 为 true 时不再提示隐式使用全局套件
    pub global: bool,

    /// 误用框架时的处理方式，只能在代码里指定，配置文件里的同名键被忽略
    #[serde(skip)]
    pub on_usage_error: UsagePolicy,
}

impl Config {
    /// 从进程参数和配置文件加载
    ///
    /// 配置文件读取失败只会记一条警告，回退到默认值。
    pub fn load() -> Self {
        Self::from_cli(&Cli::from_env())
    }

    /// 以解析好的命令行参数为准构建配置
    pub fn from_cli(cli: &Cli) -> Self {
        let base = match &cli.config {
            Some(path) => ConfigLoader::load_from_path(path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config file {}: {}", path.display(), e);
                Config::default()
            }),
            None => ConfigLoader::find_and_load().unwrap_or_default(),
        };
        base.merge_cli(cli)
    }

    /// 应用命令行覆盖
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.global {
            self.global = true;
        }
        self
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "rutest.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| RutestError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(RutestError::from)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/rutest/
    pub fn find_and_load() -> Option<Config> {
        Self::try_load_from_current_dir().or_else(Self::try_load_from_user_dir)
    }

    fn try_load_from_current_dir() -> Option<Config> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_logged(&config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<Config> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("rutest").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_logged(&config_path)
        } else {
            None
        }
    }

    fn load_logged(path: &Path) -> Option<Config> {
        match Self::load_from_path(path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {}", path.display(), e);
                None
            }
        }
    }
}
