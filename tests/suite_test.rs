use rutest::runner::{Outcome, TestReporter};
use rutest::{ReportFormat, TestSuite, UsageError, UsagePolicy};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, LocalSet};

/// 两个测试：一个记录日志后 fail_now，一个正常通过
#[tokio::test]
async fn test_fail_now_and_pass_in_registration_order() {
    let mut suite = TestSuite::new();
    suite
        .register("stops early", |t| async move {
            t.log("about to stop");
            t.fail_now()?;
            t.log("never reached");
            Ok(())
        })
        .unwrap();
    suite
        .register("passes", |_t| async { Ok(()) })
        .unwrap();

    let results = suite.run().await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "stops early");
    assert_eq!(results[0].outcome, Outcome::Fail);
    assert_eq!(results[0].logs, vec!["about to stop"]);
    assert_eq!(results[1].name, "passes");
    assert_eq!(results[1].outcome, Outcome::Pass);
    assert!(results[1].logs.is_empty());
}

/// 完成顺序与注册顺序不同时，结果仍按注册顺序返回
#[tokio::test]
async fn test_results_follow_registration_order() {
    let finished = Rc::new(RefCell::new(Vec::new()));
    let mut suite = TestSuite::new();

    for (name, delay) in [("slow", 60), ("fast", 5), ("medium", 30)] {
        let finished = finished.clone();
        suite
            .register(name, move |t| {
                let finished = finished.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    finished.borrow_mut().push(t.name().to_string());
                    Ok(())
                }
            })
            .unwrap();
    }

    let results = suite.run().await.unwrap();

    assert_eq!(*finished.borrow(), vec!["fast", "medium", "slow"]);
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["slow", "fast", "medium"]);
    assert!(results.iter().all(|r| r.outcome == Outcome::Pass));
}

/// 一个测试的意外错误不影响同组的其他测试
#[tokio::test]
async fn test_unexpected_error_is_contained() {
    let mut suite = TestSuite::new();
    suite
        .register("parses", |_t| async {
            let value: u32 = "not a number".parse()?;
            assert_eq!(value, 0);
            Ok(())
        })
        .unwrap();
    suite
        .register("sibling", |t| async move {
            t.log("still runs");
            Ok(())
        })
        .unwrap();

    let results = suite.run().await.unwrap();
    assert_eq!(results[0].outcome, Outcome::Fail);
    assert_eq!(results[1].outcome, Outcome::Pass);

    let rendered = TestReporter::new(ReportFormat::Pretty)
        .render(&results)
        .unwrap();
    assert_eq!(
        rendered,
        "[fail] parses\n  invalid digit found in string\n[pass] sibling"
    );
}

#[tokio::test]
async fn test_skip_and_soft_failures() {
    let mut suite = TestSuite::define(|s| {
        s.test("skipped after failure", |t| async move {
            t.error("looked wrong");
            t.skip()?;
            Ok(())
        })
        .test("soft failure", |t| async move {
            t.fail();
            t.log("kept going");
            Ok(())
        })
        .test("fatal", |t| async move {
            t.fatal(format_args!("status {}", 500))?;
            Ok(())
        });
    });

    let results = suite.run().await.unwrap();
    assert_eq!(results[0].outcome, Outcome::Skip);
    assert_eq!(results[1].outcome, Outcome::Fail);
    assert_eq!(results[1].logs, vec!["kept going"]);
    assert_eq!(results[2].outcome, Outcome::Fail);
    assert_eq!(results[2].logs, vec!["status 500"]);
}

#[tokio::test]
async fn test_empty_suite_produces_no_results() {
    let mut suite = TestSuite::new();
    let err = suite.run().await.unwrap_err();
    assert_eq!(err, UsageError::EmptySuite);
}

/// 测试结束后，遗留的异步回调再使用上下文会被确定地检测出来
#[tokio::test]
async fn test_dangling_callback_is_usage_error() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let (tx, rx) = oneshot::channel::<()>();
            let rx = Rc::new(RefCell::new(Some(rx)));
            let leaked: Rc<RefCell<Option<JoinHandle<()>>>> = Rc::new(RefCell::new(None));

            let mut suite = TestSuite::with_policy(UsagePolicy::Panic);
            let slot = leaked.clone();
            suite
                .register("forgets to await", move |t| {
                    let rx = rx.borrow_mut().take();
                    let slot = slot.clone();
                    async move {
                        if let Some(rx) = rx {
                            let handle = tokio::task::spawn_local(async move {
                                let _ = rx.await;
                                t.log("too late");
                            });
                            *slot.borrow_mut() = Some(handle);
                        }
                        Ok(())
                    }
                })
                .unwrap();

            let results = suite.run().await.unwrap();
            assert_eq!(results[0].outcome, Outcome::Pass);

            tx.send(()).unwrap();
            let handle = leaked.borrow_mut().take().unwrap();
            let err = handle.await.unwrap_err();
            assert!(err.is_panic());

            let payload = err.into_panic();
            let err = payload.downcast_ref::<UsageError>().unwrap();
            assert!(err
                .to_string()
                .contains("attempted to call log from test(\"forgets to await\")"));
        })
        .await;
}

/// 运行中的测试误用另一个已结束测试的上下文：误用沿 `run` 向外展开，
/// 而不是被记成这个测试的失败
#[tokio::test]
async fn test_usage_error_in_running_test_escapes_suite() {
    use futures::FutureExt;
    use rutest::TestContext;
    use std::panic::AssertUnwindSafe;

    let finished: Rc<RefCell<Option<TestContext>>> = Rc::new(RefCell::new(None));

    let mut suite = TestSuite::with_policy(UsagePolicy::Panic);
    let slot = finished.clone();
    suite
        .register("finishes first", move |t| {
            *slot.borrow_mut() = Some(t);
            async { Ok(()) }
        })
        .unwrap();
    let slot = finished.clone();
    suite
        .register("uses stale context", move |_t| {
            let slot = slot.clone();
            async move {
                tokio::task::yield_now().await;
                if let Some(stale) = slot.borrow().as_ref() {
                    stale.log("too late");
                }
                Ok(())
            }
        })
        .unwrap();

    let outcome = AssertUnwindSafe(suite.run()).catch_unwind().await;
    let payload = outcome.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<UsageError>(),
        Some(&UsageError::ContextFinished {
            method: "log",
            test: "finishes first".to_string(),
        })
    );
}
