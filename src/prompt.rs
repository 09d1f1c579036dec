//! Prompt construction from a query and filtered search results.

use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE: &str = "다음은 네이버 뉴스 API를 통해 실시간으로 검색된 최신 뉴스 정보입니다.
이 정보를 바탕으로 질문에 답해주세요. 반드시 제공된 최신 뉴스 정보만을 사용하고,
귀하의 기존 지식은 사용하지 마세요.

질문: {query}

최신 뉴스 정보:
{sources}

위 최신 뉴스 정보만을 사용하여 답변해주세요:";

pub const DEFAULT_CITATION_FORMAT: &str =
    "[{index}] 제목: {title}\n링크: {link}\n요약: {description}\n날짜: {published}";

pub const DEFAULT_NO_INFORMATION_TEXT: &str =
    "(검색된 뉴스 정보가 없습니다. 제공할 수 있는 정보가 없다고 답변해주세요.)";

/// Operator-configured prompt shape.
///
/// `template` understands `{query}` and `{sources}`; `citation_format`
/// understands `{index}`, `{title}`, `{link}`, `{description}` and
/// `{published}`. Unknown placeholders are left as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_citation_format")]
    pub citation_format: String,
    #[serde(default = "default_no_information_text")]
    pub no_information_text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: default_template(),
            citation_format: default_citation_format(),
            no_information_text: default_no_information_text(),
        }
    }
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_citation_format() -> String {
    DEFAULT_CITATION_FORMAT.to_string()
}

fn default_no_information_text() -> String {
    DEFAULT_NO_INFORMATION_TEXT.to_string()
}

/// A rendered prompt, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    sentinel: bool,
    source_count: usize,
}

impl Prompt {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when no sources survived and the "no information" text was used
    pub fn is_sentinel(&self) -> bool {
        self.sentinel
    }

    pub fn source_count(&self) -> usize {
        self.source_count
    }
}

/// Render `template` for `query` using exactly the given items.
pub fn build_prompt(query: &str, items: &[SearchResult], template: &PromptTemplate) -> Prompt {
    let sentinel = items.is_empty();

    let sources = if sentinel {
        template.no_information_text.clone()
    } else {
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| format_citation(idx + 1, item, &template.citation_format))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let text = render(&template.template, |name| match name {
        "query" => Some(query.to_string()),
        "sources" => Some(sources.clone()),
        _ => None,
    });

    tracing::debug!(
        source_count = items.len(),
        sentinel,
        prompt_chars = text.chars().count(),
        "prompt built"
    );

    Prompt {
        text,
        sentinel,
        source_count: items.len(),
    }
}

fn format_citation(index: usize, item: &SearchResult, format: &str) -> String {
    render(format, |name| match name {
        "index" => Some(index.to_string()),
        "title" => Some(item.title.clone()),
        "link" => Some(item.link.clone()),
        "description" => Some(item.description.clone()),
        "published" => Some(item.published_raw.clone().unwrap_or_default()),
        _ => None,
    })
}

/// Single-pass placeholder substitution.
///
/// Substituted values are never rescanned, so a query containing
/// `{sources}` stays literal.
fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
