/// Query-string and SQL helper functions / 查询字符串与SQL工具函数

/// Build a URL query string from key/value pairs / 构建查询字符串
/// Values are percent-encoded, keys are expected to be plain ASCII / 值会被编码
pub fn build_query_string(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Escape `%`, `_` and `\` for a LIKE pattern using `ESCAPE '\'` / 转义LIKE通配符
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wrap a value as a `%value%` containment pattern / 构建包含匹配模式
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

/// Trim a string and turn blank into None / 去除空白，空字符串返回None
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// URL slug: lowercase ASCII alphanumerics, other runs collapsed to `-` / 生成slug
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_string() {
        let pairs = [
            ("query", "a&b c".to_string()),
            ("page", "2".to_string()),
        ];
        assert_eq!(build_query_string(&pairs), "query=a%26b%20c&page=2");
        assert_eq!(build_query_string(&[]), "");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(contains_pattern("hi"), "%hi%");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ")), Some("x"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fullmetal Alchemist: Brotherhood"), "fullmetal-alchemist-brotherhood");
        assert_eq!(slugify("  Re:Zero -- Starting Life "), "re-zero-starting-life");
        assert_eq!(slugify("進撃の巨人"), "");
    }
}
