use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// 可以判断"自身是否含有某个键"的值
pub trait HasKey {
    fn has_key(&self, key: &str) -> bool;
}

impl<V, S: BuildHasher> HasKey for HashMap<String, V, S> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<V> HasKey for BTreeMap<String, V> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl HasKey for serde_json::Map<String, serde_json::Value> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

/// 非对象的 JSON 值没有任何键
impl HasKey for serde_json::Value {
    fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|obj| obj.contains_key(key))
    }
}

impl<T: HasKey + ?Sized> HasKey for &T {
    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }
}

/// 严格相等：标量和字符串按值比较，复合值只有同一个实例才相等
pub trait Identity {
    fn is_identical(&self, other: &Self) -> bool;
}

macro_rules! identity_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identity for $ty {
                fn is_identical(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

identity_by_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, (),
    str, String,
);

macro_rules! identity_by_address {
    ($($ty:ty => [$($gen:tt)*]),* $(,)?) => {
        $(
            impl<$($gen)*> Identity for $ty {
                fn is_identical(&self, other: &Self) -> bool {
                    std::ptr::eq(self, other)
                }
            }
        )*
    };
}

identity_by_address!(
    [T] => [T],
    Vec<T> => [T],
    BTreeMap<K, V> => [K, V],
    HashMap<K, V, S> => [K, V, S],
    serde_json::Map<String, serde_json::Value> => [],
);

/// null、布尔、数字、字符串按值；数组和对象按实例
impl Identity for serde_json::Value {
    fn is_identical(&self, other: &Self) -> bool {
        use serde_json::Value;

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                std::ptr::eq(self, other)
            }
            _ => false,
        }
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    fn is_identical(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    fn is_identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    fn is_identical(&self, other: &Self) -> bool {
        (**self).is_identical(*other)
    }
}
