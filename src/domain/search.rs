/// Case-insensitive substring filter built from a raw user keyword.
///
/// The keyword is escaped before being wrapped into an `ILIKE` pattern, so
/// pattern metacharacters typed by the user only ever match literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    keyword: String,
    like: String,
}

impl SearchPattern {
    /// Trim and normalize a raw keyword. Empty or whitespace-only input
    /// yields `None`, meaning no filtering at all.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let keyword = raw?.trim();
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            like: format!("%{}%", escape_like(keyword)),
            keyword: keyword.to_string(),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The `%…%` pattern with all `LIKE` wildcards in the keyword escaped.
    pub fn like_pattern(&self) -> &str {
        &self.like
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_keywords_mean_no_filter() {
        assert_eq!(SearchPattern::parse(None), None);
        assert_eq!(SearchPattern::parse(Some("")), None);
        assert_eq!(SearchPattern::parse(Some("   \t")), None);
    }

    #[test]
    fn keyword_is_trimmed() {
        let p = SearchPattern::parse(Some("  pho bo ")).expect("pattern");
        assert_eq!(p.keyword(), "pho bo");
        assert_eq!(p.like_pattern(), "%pho bo%");
    }

    #[test]
    fn regex_metacharacters_stay_literal() {
        // "a.b*c" has no LIKE wildcards, so the pattern matches exactly the
        // literal substring and nothing else.
        let p = SearchPattern::parse(Some("a.b*c")).expect("pattern");
        assert_eq!(p.like_pattern(), "%a.b*c%");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        let p = SearchPattern::parse(Some("50%_off\\now")).expect("pattern");
        assert_eq!(p.like_pattern(), "%50\\%\\_off\\\\now%");
    }
}
