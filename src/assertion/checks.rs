use crate::assertion::types::{HasKey, Identity};
use crate::runner::TestContext;
use std::fmt::Debug;

/// 断言 a 与 b 深度相等
pub fn equals<T>(t: &TestContext, a: &T, b: &T)
where
    T: PartialEq + Debug + ?Sized,
{
    if a != b {
        t.error(format_args!("expected {:?} to be deeply equal to {:?}", a, b));
    }
}

/// 断言 a 与 b 严格相等，规则见 [`Identity`]
pub fn identical<T>(t: &TestContext, a: &T, b: &T)
where
    T: Identity + Debug + ?Sized,
{
    if !a.is_identical(b) {
        t.error(format_args!("expected {:?} to be strictly equal to {:?}", a, b));
    }
}

/// 断言 obj 自身含有 key
pub fn has_key<O>(t: &TestContext, obj: &O, key: &str)
where
    O: HasKey + Debug + ?Sized,
{
    if !obj.has_key(key) {
        t.error(format_args!("expected {:?} to have key {:?}", obj, key));
    }
}

/// 断言 coll 中有与 item 严格相等的元素
pub fn contains<T>(t: &TestContext, coll: &[T], item: &T)
where
    T: Identity + Debug,
{
    if !coll.iter().any(|x| x.is_identical(item)) {
        t.error(format_args!("expected {:?} to contain {:?}", coll, item));
    }
}

/// 断言 coll 中有与 item 深度相等的元素
pub fn contains_equal<T>(t: &TestContext, coll: &[T], item: &T)
where
    T: PartialEq + Debug,
{
    if !coll.iter().any(|x| x == item) {
        t.error(format_args!("expected {:?} to contain {:?}", coll, item));
    }
}
