//! Request translation / 请求转换
//!
//! Builds the engine query document structurally. Titles come from callers
//! and are treated as untrusted: they only ever become a JSON string value,
//! so quotes, braces or backslashes are escaped by the serializer and
//! cannot change the clause.

use super::schema::{FieldMatch, QueryClause, SearchQueryBody, SearchRequest, TITLE_FIELD};

/// Clean a caller-supplied title / 清理标题
///
/// Whitespace controls (`\t`, `\n`, `\r`) still separate words and become
/// spaces; other control characters are dropped. Runs of whitespace collapse
/// to one space and the ends are trimmed.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if c.is_control() {
                None
            } else {
                Some(c)
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Translate a typed request into the engine query body / 转换为引擎查询体
///
/// Title searches are paged with `from = 0, size = page_size`; listing all
/// documents leaves pagination to the engine default.
pub fn translate(req: &SearchRequest, page_size: usize) -> SearchQueryBody {
    match req {
        SearchRequest::ByTitle { title } => SearchQueryBody {
            from: Some(0),
            size: Some(page_size),
            query: QueryClause::Match(FieldMatch {
                field: TITLE_FIELD.to_string(),
                value: sanitize_title(title),
            }),
        },
        SearchRequest::All => SearchQueryBody {
            from: None,
            size: None,
            query: QueryClause::MatchAll {},
        },
    }
}
