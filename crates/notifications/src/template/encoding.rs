//! 花括号编码
//!
//! 富文本编辑器会把链接属性中的 `{{`、`}}` 百分号编码为 `%7B%7B`、`%7D%7D`，
//! 渲染前需要还原，保存到编辑器前需要编码。

use std::sync::LazyLock;

use regex::Regex;

static ENCODED_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)%7B%7B").unwrap());
static ENCODED_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)%7D%7D").unwrap());

/// 把 `{{` / `}}` 编码为 `%7B%7B` / `%7D%7D`
pub fn encode_template_braces(source: &str) -> String {
    source.replace("{{", "%7B%7B").replace("}}", "%7D%7D")
}

/// 把 `%7B%7B` / `%7D%7D`（大小写不敏感）还原为 `{{` / `}}`
pub fn decode_template_braces(source: &str) -> String {
    let opened = ENCODED_OPEN.replace_all(source, "{{");
    ENCODED_CLOSE.replace_all(&opened, "}}").into_owned()
}
