//! String-based type resolution.
//!
//! Raw source type expressions are mapped to target-language expressions by
//! staged string-pattern matching, evaluated lazily at emission time and
//! memoized per raw expression. Unmapped names pass through unchanged on the
//! assumption they reference another declaration emitted in the same file.

use crate::config::Config;
use lazy_static::lazy_static;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

lazy_static! {
    /// Single-type-argument generic array form: `Array<T>`
    static ref GENERIC_ARRAY: Regex = Regex::new(r"^Array<(.+)>$").unwrap();
}

/// Sentinel for unmapped scalar entries and missing alias expressions
pub const ANY_TYPE: &str = "Any";

pub struct TypeResolver<'a> {
    config: &'a Config,
    memo: RefCell<HashMap<String, String>>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a raw type expression to its target-language form
    pub fn resolve(&self, raw: &str) -> String {
        let expr = raw.trim();

        if let Some(cached) = self.memo.borrow().get(expr) {
            return cached.clone();
        }

        let resolved = self.resolve_uncached(expr);
        self.memo
            .borrow_mut()
            .insert(expr.to_string(), resolved.clone());
        resolved
    }

    fn resolve_uncached(&self, expr: &str) -> String {
        // Custom type overrides bypass everything: the name already binds to
        // a pre-rendered alias carrying its own field wrapper.
        if self.config.custom_types.contains_key(expr) {
            return expr.to_string();
        }

        if let Some(mapped) = self.config.type_mapping.get(expr) {
            if mapped.is_empty() {
                return ANY_TYPE.to_string();
            }
            return mapped.clone();
        }

        if let Some(item) = expr.strip_suffix("[]") {
            return format!("List[{}]", self.resolve(item));
        }

        if let Some(captures) = GENERIC_ARRAY.captures(expr) {
            return format!("List[{}]", self.resolve(&captures[1]));
        }

        let alternatives = split_top_level(expr, '|');
        if alternatives.len() >= 2 {
            let resolved: Vec<String> = alternatives.iter().map(|a| self.resolve(a)).collect();
            return format!("Union[{}]", resolved.join(", "));
        }

        // Inline object shapes degrade to an untyped mapping
        if expr.starts_with('{') && expr.ends_with('}') {
            return "Dict[str, Any]".to_string();
        }

        // Assume a reference to another declaration in the same output file
        expr.to_string()
    }
}

/// Strip one array shape (`T[]` or `Array<T>`) off an expression, returning
/// the element expression
pub fn strip_array_shape(expr: &str) -> Option<&str> {
    let expr = expr.trim();
    if let Some(item) = expr.strip_suffix("[]") {
        return Some(item.trim_end());
    }
    GENERIC_ARRAY
        .captures(expr)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Split an expression on `sep`, honoring brackets and quotes, so only
/// top-level separators count
pub fn split_top_level(expr: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in expr.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(expr[start..i].trim());
                start = i + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(expr[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomType;

    fn config() -> Config {
        let mut config = Config::default();
        config.type_mapping.insert("string".into(), "str".into());
        config.type_mapping.insert("number".into(), "float".into());
        config.type_mapping.insert("boolean".into(), "bool".into());
        config.type_mapping.insert("Date".into(), "datetime".into());
        config.custom_types.insert(
            "MdContent".into(),
            CustomType {
                python_type: "str".into(),
                field: "Field(..., description='markdown')".into(),
            },
        );
        config
    }

    #[test]
    fn test_scalar_mapping_round_trip() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        for (k, v) in &config.type_mapping {
            assert_eq!(&resolver.resolve(k), v);
        }
    }

    #[test]
    fn test_custom_type_passes_through() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("MdContent"), "MdContent");
    }

    #[test]
    fn test_empty_mapping_value_yields_any() {
        let mut config = config();
        config.type_mapping.insert("unknown".into(), String::new());
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("unknown"), ANY_TYPE);
    }

    #[test]
    fn test_bracket_array_suffix() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("string[]"), "List[str]");
        assert_eq!(resolver.resolve("string[][]"), "List[List[str]]");
    }

    #[test]
    fn test_generic_array_form() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("Array<number>"), "List[float]");
        assert_eq!(resolver.resolve("Array<Array<string>>"), "List[List[str]]");
    }

    #[test]
    fn test_union_resolution() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("number | null"), "Union[float, null]");
        assert_eq!(resolver.resolve("'a' | 'b'"), "Union['a', 'b']");
    }

    #[test]
    fn test_union_split_ignores_nested_pipes() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        // The pipe inside the generic arguments is not a top-level union
        assert_eq!(resolver.resolve("Record<string, A | B>"), "Record<string, A | B>");
    }

    #[test]
    fn test_object_shape_degrades_to_dict() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("{ a: string }"), "Dict[str, Any]");
    }

    #[test]
    fn test_unknown_name_falls_through() {
        let config = config();
        let resolver = TypeResolver::new(&config);
        assert_eq!(resolver.resolve("CourseId"), "CourseId");
    }

    #[test]
    fn test_strip_array_shape() {
        assert_eq!(strip_array_shape("Tag[]"), Some("Tag"));
        assert_eq!(strip_array_shape("Array<Tag>"), Some("Tag"));
        assert_eq!(strip_array_shape("Tag"), None);
    }

    #[test]
    fn test_split_top_level_quotes() {
        assert_eq!(split_top_level("'a|b' | 'c'", '|'), vec!["'a|b'", "'c'"]);
    }
}
