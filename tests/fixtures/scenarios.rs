//! 集成测试用的进程：第一个位置参数选择一种场景，其余参数照常交给 rutest

use rutest::test;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let scenario = std::env::args().nth(1).unwrap_or_default();

    match scenario.as_str() {
        "late-callback" => rutest::main(|| {
            test("forgets to await", |t| async move {
                tokio::task::spawn_local(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    t.log("too late");
                });
                Ok(())
            });
        }),
        "late-registration" => rutest::main(|| {
            test("early", |_t| async { Ok(()) });
            tokio::task::spawn_local(async {
                tokio::task::yield_now().await;
                test("late", |_t| async { Ok(()) });
            });
        }),
        "failing" => rutest::main(|| {
            test("passes", |_t| async { Ok(()) });
            test("fails", |t| async move {
                t.error("expected 1 to be deeply equal to 2");
                Ok(())
            });
        }),
        "outside-local-set" => {
            test("orphan", |_t| async { Ok(()) });
            ExitCode::SUCCESS
        }
        "empty" => rutest::main(|| {}),
        other => {
            eprintln!("unknown scenario: {:?}", other);
            ExitCode::from(2)
        }
    }
}
