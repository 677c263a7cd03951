//! Placeholder scanner for `{{variable}}` syntax
//!
//! Scans text lazily and yields each placeholder with its byte span.

use std::iter::FusedIterator;
use std::ops::Range;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The variable name, with surrounding whitespace trimmed.
    pub name: &'a str,

    /// Byte range of the whole `{{ ... }}` token in the template.
    pub span: Range<usize>,
}

impl Placeholder<'_> {
    /// Byte offset of the opening braces.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start
    }

    /// Returns true if the name lives in the reserved system namespace.
    #[must_use]
    pub fn is_system(&self) -> bool {
        dynvar_domain::variable::is_reserved_name(self.name)
    }
}

/// Lazy iterator over the placeholders of a template.
///
/// Finite and fused. A clone resumes from the same position; call
/// [`scan`] again to start over.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(found) = self.input[self.pos..].find(OPEN) {
            let open = self.pos + found;
            let body_start = open + OPEN.len();
            let rest = &self.input[body_start..];

            match rest.find(|c: char| c == '{' || c == '}') {
                Some(brace) if rest[brace..].starts_with(CLOSE) => {
                    let end = body_start + brace + CLOSE.len();
                    self.pos = end;

                    let name = rest[..brace].trim();
                    if name.is_empty() {
                        // `{{}}` and `{{  }}` stay literal
                        continue;
                    }
                    return Some(Placeholder {
                        name,
                        span: open..end,
                    });
                }
                // Unmatched or nested braces: treat the first `{` as text.
                _ => self.pos = open + 1,
            }
        }

        self.pos = self.input.len();
        None
    }
}

impl FusedIterator for Placeholders<'_> {}

/// Starts a lazy scan of `input`.
///
/// Recognizes `{{name}}` tokens whose body holds no braces. Whitespace inside
/// the braces is trimmed. Malformed tokens are left as literal text.
///
/// # Examples
///
/// ```
/// use dynvar_application::variable_resolver::parser::scan;
///
/// let names: Vec<_> = scan("Hello {{ user_name }}, it is {{system__time_utc}}")
///     .map(|p| p.name)
///     .collect();
/// assert_eq!(names, ["user_name", "system__time_utc"]);
/// ```
#[must_use]
pub const fn scan(input: &str) -> Placeholders<'_> {
    Placeholders { input, pos: 0 }
}

/// Collects every placeholder in `input`.
#[must_use]
pub fn parse_variables(input: &str) -> Vec<Placeholder<'_>> {
    scan(input).collect()
}

/// Returns true if the input contains at least one placeholder.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    scan(input).next().is_some()
}

/// Extracts just the variable names, in order of appearance.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    scan(input).map(|p| p.name.to_string()).collect()
}

/// Returns true if `name` could be written as a placeholder body.
#[must_use]
pub fn is_valid_variable_name(name: &str) -> bool {
    dynvar_domain::variable::is_referenceable_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(input: &str) -> Vec<&str> {
        scan(input).map(|p| p.name).collect()
    }

    #[test]
    fn test_parse_simple_variable() {
        let refs = parse_variables("{{name}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..8);
    }

    #[test]
    fn test_parse_system_variable() {
        let refs = parse_variables("{{system__agent_id}}");
        assert_eq!(refs.len(), 1);
        assert!(refs[0].is_system());
    }

    #[test]
    fn test_parse_multiple_variables() {
        assert_eq!(
            names("Hello {{user_name}}, balance {{balance}}"),
            ["user_name", "balance"]
        );
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_variables("{{  name \t}}");
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..12);
    }

    #[test]
    fn test_no_variables() {
        assert!(parse_variables("Hello, World!").is_empty());
        assert!(parse_variables("").is_empty());
    }

    #[test]
    fn test_unclosed_variable() {
        assert!(names("{{name").is_empty());
        assert!(names("{{name}").is_empty());
    }

    #[test]
    fn test_unclosed_then_valid() {
        let input = "{{oops and {{name}}";
        let refs = parse_variables(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(&input[refs[0].span.clone()], "{{name}}");
    }

    #[test]
    fn test_empty_variable() {
        assert!(names("{{}}").is_empty());
        assert!(names("{{   }}").is_empty());
    }

    #[test]
    fn test_nested_braces() {
        let input = "{{{name}}}";
        let refs = parse_variables(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 1..9);
    }

    #[test]
    fn test_single_close_brace_in_body() {
        assert!(names("{{a}b}}").is_empty());
    }

    #[test]
    fn test_single_brace() {
        assert!(names("{name}").is_empty());
    }

    #[test]
    fn test_adjacent_variables() {
        assert_eq!(names("{{a}}{{b}}{{c}}"), ["a", "b", "c"]);
    }

    #[test]
    fn test_variable_in_json() {
        assert_eq!(
            names(r#"{"name": "{{user_name}}", "id": "{{system__call_sid}}"}"#),
            ["user_name", "system__call_sid"]
        );
    }

    #[test]
    fn test_unicode_offsets() {
        let input = "héllo {{név}} ✓";
        let refs = parse_variables(input);
        assert_eq!(refs[0].name, "név");
        assert_eq!(&input[refs[0].span.clone()], "{{név}}");
    }

    #[test]
    fn test_scan_is_lazy_and_restartable() {
        let input = "{{a}} {{b}}";
        let mut first = scan(input);
        assert_eq!(first.next().map(|p| p.name), Some("a"));

        let saved = first.clone();
        assert_eq!(first.next().map(|p| p.name), Some("b"));
        assert_eq!(first.next(), None);
        assert_eq!(first.next(), None);

        assert_eq!(saved.map(|p| p.name).collect::<Vec<_>>(), ["b"]);
        assert_eq!(names(input), ["a", "b"]);
    }

    #[test]
    fn test_has_variables() {
        assert!(has_variables("Hello {{name}}!"));
        assert!(!has_variables("Hello World!"));
        assert!(!has_variables("{{incomplete"));
        assert!(!has_variables("{{}}"));
    }

    #[test]
    fn test_extract_variable_names() {
        assert_eq!(extract_variable_names("{{a}} and {{b}} and {{a}}"), ["a", "b", "a"]);
    }

    #[test]
    fn test_valid_variable_names() {
        assert!(is_valid_variable_name("name"));
        assert!(is_valid_variable_name("system__agent_id"));
        assert!(!is_valid_variable_name(""));
        assert!(!is_valid_variable_name(" x"));
        assert!(!is_valid_variable_name("a}"));
    }
}
