use crate::assertion::checks;
use crate::assertion::types::{HasKey, Identity};
use crate::runner::TestContext;
use std::fmt::Debug;

/// 绑定到某个测试上下文的断言集合，省去每次传入上下文
///
/// ```ignore
/// let assert = Assert::bind(&t);
/// assert.equals(&1, &1);
/// assert.has_key(&body, "token");
/// ```
#[derive(Debug, Clone)]
pub struct Assert {
    t: TestContext,
}

impl Assert {
    pub fn bind(t: &TestContext) -> Self {
        Self { t: t.clone() }
    }

    pub fn equals<T: PartialEq + Debug + ?Sized>(&self, a: &T, b: &T) {
        checks::equals(&self.t, a, b);
    }

    pub fn identical<T: Identity + Debug + ?Sized>(&self, a: &T, b: &T) {
        checks::identical(&self.t, a, b);
    }

    pub fn has_key<O: HasKey + Debug + ?Sized>(&self, obj: &O, key: &str) {
        checks::has_key(&self.t, obj, key);
    }

    pub fn contains<T: Identity + Debug>(&self, coll: &[T], item: &T) {
        checks::contains(&self.t, coll, item);
    }

    pub fn contains_equal<T: PartialEq + Debug>(&self, coll: &[T], item: &T) {
        checks::contains_equal(&self.t, coll, item);
    }
}
