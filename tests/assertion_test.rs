use rutest::assertion::{self, Assert};
use rutest::runner::Outcome;
use rutest::TestSuite;
use serde_json::json;
use std::collections::HashMap;

/// 断言失败只记录并标记失败，测试函数会继续执行
#[tokio::test]
async fn test_assertions_inside_suite() {
    let mut suite = TestSuite::define(|s| {
        s.test("all good", |t| async move {
            let assert = Assert::bind(&t);
            let body = json!({"token": "abc", "roles": ["admin"]});

            assert.equals(&body["token"], &json!("abc"));
            assert.has_key(&body, "roles");
            assert.identical(&body, &body);
            assert.contains_equal(&["admin", "user"], &"admin");
            assert.contains(&["admin", "user"], &"admin");
            assert.contains(&[1, 2, 3], &2);
            assert.identical(&body["token"], &json!("abc"));
            Ok(())
        })
        .test("collects every failure", |t| async move {
            assertion::equals(&t, &json!({"a": 1}), &json!({"a": 2}));
            assertion::identical(&t, &json!({}), &json!({}));

            let mut headers = HashMap::new();
            headers.insert("accept".to_string(), "json");
            assertion::has_key(&t, &headers, "content-type");

            t.log("reached the end");
            Ok(())
        });
    });

    let results = suite.run().await.unwrap();

    assert_eq!(results[0].outcome, Outcome::Pass);
    assert!(results[0].logs.is_empty());

    assert_eq!(results[1].outcome, Outcome::Fail);
    assert_eq!(results[1].logs.len(), 4);
    assert!(results[1].logs[0].contains("to be deeply equal to"));
    assert!(results[1].logs[1].contains("to be strictly equal to"));
    assert!(results[1].logs[2].contains("to have key \"content-type\""));
    assert_eq!(results[1].logs[3], "reached the end");
}

#[tokio::test]
async fn test_contains_by_identity() {
    let mut suite = TestSuite::new();
    suite
        .register("identity", |t| async move {
            let items = vec![json!({"id": 1}), json!({"id": 2})];
            assertion::contains(&t, &items, &items[0]);
            assertion::contains(&t, &items, &json!({"id": 1}));
            Ok(())
        })
        .unwrap();

    let results = suite.run().await.unwrap();
    assert_eq!(results[0].outcome, Outcome::Fail);
    assert_eq!(results[0].logs.len(), 1);
    assert!(results[0].logs[0].contains("to contain"));
}
