/// 核心校验宏：字符串去掉首尾空白后为空时，返回格式化的校验错误 (RelayError::Validation)
#[macro_export]
macro_rules! ensure_not_blank {
    ($text:expr, $($arg:tt)+) => {
        if $text.trim().is_empty() {
            return Err($crate::RelayError::Validation(format!($($arg)+)).into());
        }
    };
}
