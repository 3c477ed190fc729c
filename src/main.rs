use rutest::{Assert, test};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    rutest::main(|| {
        test("arithmetic", |t| async move {
            let assert = Assert::bind(&t);
            assert.equals(&(2 + 2), &4);
            assert.contains(&[1, 2, 3], &2);
            assert.identical("rutest", "rutest");
            Ok(())
        });

        test("async sleep", |t| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            t.log("woke up");
            Ok(())
        });

        test("needs network", |t| async move {
            if std::env::var_os("RUTEST_NETWORK").is_none() {
                t.skip()?;
            }
            Ok(())
        });
    })
}
