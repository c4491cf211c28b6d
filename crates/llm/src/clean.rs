/// 代码围栏标记
const FENCE: &str = "```";

/// 清洗补全结果：去掉包裹在外层的 ``` 代码围栏
///
/// 处理逻辑：
/// 1. 文本（去掉首部空白后）不以 ``` 开头时只做 trim。
/// 2. 否则，若第一行是围栏（如 "```" 或 "```json"）则丢弃第一行；
///    若最后一行只包含 "```" 则丢弃最后一行。
/// 3. 结果再 trim 一次；仍以 ``` 开头则重复以上步骤。
///
/// 幂等：对已经清洗过的文本再次调用不会有任何变化。
pub fn clean_completion(text: &str) -> String {
    let mut current = text.trim().to_string();

    // 第一行必然是围栏，每轮至少去掉一行，循环一定会结束；
    // 循环到没有外层围栏为止，保证 clean(clean(x)) == clean(x)
    while current.starts_with(FENCE) {
        let mut lines: Vec<&str> = current.lines().collect();
        lines.remove(0);
        if lines.last().is_some_and(|l| l.trim() == FENCE) {
            lines.pop();
        }
        current = lines.join("\n").trim().to_string();
    }

    current
}
