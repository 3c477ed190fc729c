//! 隐式的全局测试套件
//!
//! 直接调用 [`test`] 注册的测试会进入这里。第一次注册时创建套件并用
//! `spawn_local` 排一次运行：当前任务让出控制权之前，同步注册的测试都会收集
//! 进来；运行开始后再注册属于误用。

use crate::config::Config;
use crate::error::{RutestError, UsageError};
use crate::logger;
use crate::runner::case::TestFnResult;
use crate::runner::context::TestContext;
use crate::runner::reporter::TestReporter;
use crate::runner::suite::TestSuite;
use crate::runner::types::{TestResult, TestSummary};
use colored::Colorize;
use std::cell::{OnceCell, RefCell};
use std::future::Future;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use std::rc::Rc;
use tokio::task::{JoinHandle, LocalSet};
use tracing::{debug, info, warn};

/// 全局套件的生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientPhase {
    Absent,
    Collecting,
    Running,
    Done,
}

enum AmbientState {
    Absent,
    Collecting(TestSuite),
    Running,
    Done,
}

impl AmbientState {
    fn phase(&self) -> AmbientPhase {
        match self {
            AmbientState::Absent => AmbientPhase::Absent,
            AmbientState::Collecting(_) => AmbientPhase::Collecting,
            AmbientState::Running => AmbientPhase::Running,
            AmbientState::Done => AmbientPhase::Done,
        }
    }
}

/// 一次全局运行的产物
#[derive(Debug, Clone)]
pub struct AmbientReport {
    pub results: Vec<TestResult>,
    /// 按配置格式渲染好的报告
    pub rendered: String,
}

impl AmbientReport {
    pub fn summary(&self) -> TestSummary {
        TestSummary::from_results(&self.results)
    }
}

/// 全局套件的控制器
///
/// 状态只会沿 Absent → Collecting → Running → Done 前进一次，报告写出之后
/// 才进入 Done。调度依赖 `tokio::task::spawn_local`，因此注册必须发生在
/// [`LocalSet`] 里。
pub struct AmbientSuite {
    config: Config,
    output: RefCell<Option<Box<dyn Write>>>,
    state: RefCell<AmbientState>,
    task: RefCell<Option<JoinHandle<crate::Result<AmbientReport>>>>,
}

impl AmbientSuite {
    /// 运行结束后把报告打印到 stdout
    pub fn new(config: Config) -> Rc<Self> {
        Self::build(config, Some(Box::new(std::io::stdout())))
    }

    /// 只渲染报告，不打印
    pub fn silent(config: Config) -> Rc<Self> {
        Self::build(config, None)
    }

    /// 把报告写到指定的输出
    pub fn with_output(config: Config, output: impl Write + 'static) -> Rc<Self> {
        Self::build(config, Some(Box::new(output)))
    }

    fn build(config: Config, output: Option<Box<dyn Write>>) -> Rc<Self> {
        Rc::new(Self {
            config,
            output: RefCell::new(output),
            state: RefCell::new(AmbientState::Absent),
            task: RefCell::new(None),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> AmbientPhase {
        self.state.borrow().phase()
    }

    /// 注册一个测试
    ///
    /// 第一次注册会创建套件并安排运行；套件开始运行后再注册返回
    /// [`UsageError::LateRegistration`]，不在 [`LocalSet`] 里时返回
    /// [`UsageError::NoLocalSet`]。
    pub fn register<F, Fut>(
        self: &Rc<Self>,
        name: impl Into<String>,
        f: F,
    ) -> Result<(), UsageError>
    where
        F: Fn(TestContext) -> Fut + 'static,
        Fut: Future<Output = TestFnResult> + 'static,
    {
        let name = name.into();
        let mut state = self.state.borrow_mut();

        match &mut *state {
            AmbientState::Collecting(suite) => return suite.register(name, f),
            AmbientState::Running | AmbientState::Done => {
                return Err(UsageError::LateRegistration(name));
            }
            AmbientState::Absent => {}
        }

        let handle = self.schedule(&name)?;
        if !self.config.global {
            print_implicit_warning(&name);
        }

        let mut suite = TestSuite::with_policy(self.config.on_usage_error);
        suite.register(name, f)?;
        *state = AmbientState::Collecting(suite);
        drop(state);

        *self.task.borrow_mut() = Some(handle);
        Ok(())
    }

    /// 等待已安排的运行结束；从未注册过测试时返回 `None`
    pub async fn wait(&self) -> crate::Result<Option<AmbientReport>> {
        let handle = self.task.borrow_mut().take();
        match handle {
            Some(handle) => Ok(Some(handle.await??)),
            None => Ok(None),
        }
    }

    /// 任务在当前任务让出之前不会被轮询，调用方可以先把状态切到 Collecting
    fn schedule(
        self: &Rc<Self>,
        name: &str,
    ) -> Result<JoinHandle<crate::Result<AmbientReport>>, UsageError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(UsageError::NoLocalSet(name.to_string()));
        }

        // 在运行时里但不在 LocalSet 里时 spawn_local 会 panic
        let this = Rc::clone(self);
        let handle = std::panic::catch_unwind(AssertUnwindSafe(move || {
            tokio::task::spawn_local(async move { this.execute().await })
        }))
        .map_err(|_| UsageError::NoLocalSet(name.to_string()))?;

        debug!("Scheduled ambient suite run");
        Ok(handle)
    }

    async fn execute(&self) -> crate::Result<AmbientReport> {
        let taken = std::mem::replace(&mut *self.state.borrow_mut(), AmbientState::Running);
        let mut suite = match taken {
            AmbientState::Collecting(suite) => suite,
            other => {
                let phase = other.phase();
                *self.state.borrow_mut() = other;
                return Err(RutestError::Other(format!(
                    "ambient suite cannot start from phase {:?}",
                    phase
                )));
            }
        };

        info!("Running {} tests from the global suite", suite.len());
        let report = match suite.run().await {
            Ok(results) => self.report(results),
            Err(e) => Err(e.into()),
        };
        *self.state.borrow_mut() = AmbientState::Done;

        let report = report?;
        info!("Global suite finished: {}", report.summary());
        Ok(report)
    }

    fn report(&self, results: Vec<TestResult>) -> crate::Result<AmbientReport> {
        let reporter = TestReporter::new(self.config.format);
        let rendered = reporter.render(&results)?;
        if let Some(output) = self.output.borrow_mut().as_mut() {
            writeln!(output, "{}", rendered)?;
            output.flush()?;
        }
        Ok(AmbientReport { results, rendered })
    }
}

fn print_implicit_warning(name: &str) {
    warn!(test = name, "test() called outside of a test suite");

    let rule = "-".repeat(66);
    eprintln!(
        "{}\n{}\n\nOffending test: \"{}\"\n\n\
         To remove this warning, either:\n    \
         - Use TestSuite::define(cb)\n    \
         - Pass --global to ignore this warning\n{}",
        rule.yellow(),
        "Warning: you called test() outside of a test suite. Your test will\n\
         be added to the global test suite."
            .yellow(),
        name,
        rule.yellow()
    );
}

thread_local! {
    static AMBIENT: OnceCell<Rc<AmbientSuite>> = const { OnceCell::new() };
}

/// 安装当前线程的全局套件；已安装时保留原实例并原样返回
pub fn install(config: Config) -> Rc<AmbientSuite> {
    AMBIENT.with(|cell| {
        if cell.get().is_some() {
            debug!("Global suite already installed, keeping existing config");
        }
        Rc::clone(cell.get_or_init(|| AmbientSuite::new(config)))
    })
}

/// 当前线程的全局套件，不存在时按进程参数创建
pub fn global() -> Rc<AmbientSuite> {
    AMBIENT.with(|cell| Rc::clone(cell.get_or_init(|| AmbientSuite::new(Config::load()))))
}

/// 向全局套件注册测试
///
/// 测试会在当前同步注册阶段结束后自动运行。需要分组或控制运行时机时，
/// 改用 [`TestSuite::define`]。运行开始后再调用是致命的误用。
pub fn test<F, Fut>(name: impl Into<String>, f: F)
where
    F: Fn(TestContext) -> Fut + 'static,
    Fut: Future<Output = TestFnResult> + 'static,
{
    let suite = global();
    if let Err(err) = suite.register(name, f) {
        suite.config().on_usage_error.raise(err);
    }
}

/// 全局套件的进程入口
///
/// 初始化日志、读取配置、搭好单线程运行时，在其中调用 `register`，等待
/// 全局套件跑完。有失败的测试时返回失败的退出码。
pub fn main(register: impl FnOnce()) -> ExitCode {
    logger::init_logger();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}: failed to start runtime: {}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let suite = install(Config::load());
    let local = LocalSet::new();
    let outcome = local.block_on(&runtime, async move {
        register();
        suite.wait().await
    });

    // 报告之后还在排队的任务也要跑完，迟到的回调会在这里触发误用
    if outcome.is_ok() {
        debug!("Draining tasks left on the local set");
        runtime.block_on(local);
    }

    match outcome {
        Ok(Some(report)) if report.summary().success() => ExitCode::SUCCESS,
        Ok(Some(_)) => ExitCode::FAILURE,
        Ok(None) => {
            warn!("No tests were registered");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
