/// 断言模块 - 比较失败时调用 `TestContext::error`，记录日志并标记失败但不中止测试
mod bound;
mod checks;
mod types;

pub use bound::Assert;
pub use checks::{contains, contains_equal, equals, has_key, identical};
pub use types::{HasKey, Identity};
