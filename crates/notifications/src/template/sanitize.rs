//! 模板 HTML 清洗
//!
//! 管理员提交的模板源码在保存前经过白名单清洗：
//! 去掉脚本与事件属性，额外允许嵌入 YouTube 的 iframe。
//!
//! 清洗按 HTML5 规则解析，`<style>` 块连同内容一起移除（样式需写在 `style` 属性上）；
//! 表格中位于单元格之外的文本（包括 `{{#if}}` 这类块标记）会被移到表格前面，
//! 条件块需要放在 `<td>` 内部或包住整个表格。

use std::borrow::Cow;

use ammonia::Builder;
use url::Url;

/// 允许作为 iframe 来源的主机
pub const ALLOWED_IFRAME_HOST: &str = "www.youtube.com";

const EXTRA_TAGS: [&str; 2] = ["iframe", "center"];
const IFRAME_ATTRIBUTES: [&str; 5] = ["src", "width", "height", "frameborder", "allowfullscreen"];
const GENERIC_ATTRIBUTES: [&str; 4] = ["style", "class", "align", "bgcolor"];

/// iframe 的 src 必须指向允许的主机，否则丢弃该属性
fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    match (element, attribute) {
        ("iframe", "src") => {
            let url = Url::parse(value).ok()?;
            (url.host_str() == Some(ALLOWED_IFRAME_HOST)).then_some(Cow::Borrowed(value))
        }
        _ => Some(Cow::Borrowed(value)),
    }
}

/// 清洗模板源码
pub fn sanitize_template(source: &str) -> String {
    let mut builder = Builder::default();
    builder
        .add_tags(&EXTRA_TAGS)
        .add_tag_attributes("iframe", &IFRAME_ATTRIBUTES)
        .add_generic_attributes(&GENERIC_ATTRIBUTES)
        .attribute_filter(filter_attribute);
    builder.clean(source).to_string()
}
