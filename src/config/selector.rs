//! Selector expressions: parse once into a tree, evaluate repeatedly.
//!
//! A profile's `selectors` value is a duck-typed JSON object — a key can
//! hold a string, an array, or a nested object depending on the operator.
//! That shape is normalised here, at the data-model boundary, into an
//! explicit [`Selector`] tree; evaluation walks the tree against a
//! [`Context`] and performs no parsing or I/O of its own.
//!
//! Several sibling keys under one operator body are an implicit
//! conjunction (for `and` and at the top level) or disjunction (for `or`);
//! normalisation turns them into explicit child lists so the ambiguity
//! never reaches the evaluator.

use std::path::Path;

use serde_json::Value;

use crate::context::Context;
use crate::error::SelectorError;
use crate::expand;

/// A parsed selector expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// True iff the path exists as a regular file after expansion.
    File(String),
    /// True iff the path exists as a directory after expansion.
    Dir(String),
    /// True iff the hostname matches any of the patterns.
    Host(Vec<String>),
    /// True iff the username matches any of the names exactly.
    User(Vec<String>),
    /// True iff every child is true; the empty conjunction is true.
    And(Vec<Selector>),
    /// True iff any child is true; the empty disjunction is false.
    Or(Vec<Selector>),
    /// True iff the child is false.
    Not(Box<Selector>),
}

impl Selector {
    /// Parse the `selectors` value of a descriptor.
    ///
    /// Multiple keys at the top level are an implicit conjunction.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] for unknown keys, malformed values, or
    /// a `not` body without exactly one selector.
    pub fn parse(value: &Value) -> Result<Self, SelectorError> {
        let mut children = parse_children(value, "selectors")?;
        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(Self::And(children))
        }
    }

    /// Evaluate the expression against the given context.
    ///
    /// Pure: the only I/O is the context's own existence checks. A path
    /// whose expansion fails (unset variable) is treated as nonexistent,
    /// so the leaf evaluates false rather than erroring.
    #[must_use]
    pub fn evaluate(&self, ctx: &dyn Context) -> bool {
        match self {
            Self::File(raw) => expand::expand(raw, ctx)
                .is_ok_and(|path| ctx.is_file(Path::new(&path))),
            Self::Dir(raw) => expand::expand(raw, ctx)
                .is_ok_and(|path| ctx.is_dir(Path::new(&path))),
            Self::Host(patterns) => host_matches(patterns, ctx.hostname()),
            Self::User(names) => names.iter().any(|n| n == ctx.username()),
            Self::And(children) => children.iter().all(|c| c.evaluate(ctx)),
            Self::Or(children) => children.iter().any(|c| c.evaluate(ctx)),
            Self::Not(child) => !child.evaluate(ctx),
        }
    }
}

/// Parse an operator body into its list of child selectors.
///
/// `context_key` names the enclosing operator for error messages.
fn parse_children(value: &Value, context_key: &str) -> Result<Vec<Selector>, SelectorError> {
    let Value::Object(map) = value else {
        return Err(SelectorError::InvalidValue {
            key: context_key.to_string(),
            expected: "an object of selectors",
        });
    };

    let mut children = Vec::with_capacity(map.len());
    for (key, body) in map {
        children.push(parse_one(key, body)?);
    }
    Ok(children)
}

/// Parse a single `key: body` selector entry.
fn parse_one(key: &str, body: &Value) -> Result<Selector, SelectorError> {
    match key {
        "file" => Ok(Selector::File(string_value(key, body)?)),
        "dir" => Ok(Selector::Dir(string_value(key, body)?)),
        "host" => Ok(Selector::Host(string_list(key, body)?)),
        "user" => Ok(Selector::User(string_list(key, body)?)),
        "and" => Ok(Selector::And(parse_children(body, key)?)),
        "or" => Ok(Selector::Or(parse_children(body, key)?)),
        "not" => {
            let mut children = parse_children(body, key)?;
            if children.len() == 1 {
                Ok(Selector::Not(Box::new(children.remove(0))))
            } else {
                Err(SelectorError::NotArity)
            }
        }
        other => Err(SelectorError::UnknownKey(other.to_string())),
    }
}

/// The body must be a single string.
fn string_value(key: &str, body: &Value) -> Result<String, SelectorError> {
    body.as_str()
        .map(ToString::to_string)
        .ok_or_else(|| SelectorError::InvalidValue {
            key: key.to_string(),
            expected: "a string",
        })
}

/// The body may be a string or an array of strings.
fn string_list(key: &str, body: &Value) -> Result<Vec<String>, SelectorError> {
    let invalid = || SelectorError::InvalidValue {
        key: key.to_string(),
        expected: "a string or an array of strings",
    };
    match body {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(ToString::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

/// Match the hostname against one pattern list.
///
/// `*` matches anything; a pattern starting with `.` matches as a domain
/// suffix of the full hostname (the suffix includes the dot boundary, so
/// `.example.com` matches `foo.example.com` but not `example.com`);
/// otherwise the pattern must equal the full hostname or its first
/// dot-separated label. Matching is case-sensitive.
fn host_matches(patterns: &[String], hostname: &str) -> bool {
    let short = hostname.split('.').next().unwrap_or(hostname);
    patterns.iter().any(|pattern| {
        let p = pattern.as_str();
        p == "*"
            || p == hostname
            || p == short
            || (p.starts_with('.') && hostname.ends_with(p))
    })
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::context::FakeContext;
    use serde_json::json;

    fn parse(value: Value) -> Selector {
        Selector::parse(&value).expect("selector should parse")
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_file_selector() {
        assert_eq!(
            parse(json!({"file": "~/.gitconfig"})),
            Selector::File("~/.gitconfig".to_string())
        );
    }

    #[test]
    fn parse_dir_selector() {
        assert_eq!(
            parse(json!({"dir": "~/git"})),
            Selector::Dir("~/git".to_string())
        );
    }

    #[test]
    fn parse_host_string_and_array() {
        assert_eq!(
            parse(json!({"host": "devbox"})),
            Selector::Host(vec!["devbox".to_string()])
        );
        assert_eq!(
            parse(json!({"host": ["devbox", ".example.com"]})),
            Selector::Host(vec!["devbox".to_string(), ".example.com".to_string()])
        );
    }

    #[test]
    fn parse_user_selector() {
        assert_eq!(
            parse(json!({"user": "sam"})),
            Selector::User(vec!["sam".to_string()])
        );
    }

    #[test]
    fn top_level_multi_key_is_implicit_and() {
        let sel = parse(json!({"host": "devbox", "file": "~/.gitconfig"}));
        assert!(matches!(&sel, Selector::And(children) if children.len() == 2));
    }

    #[test]
    fn and_body_multi_key_normalises_to_children() {
        let sel = parse(json!({"and": {"host": "devbox", "dir": "~/git"}}));
        let Selector::And(children) = sel else {
            panic!("expected And");
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn or_body_multi_key_normalises_to_children() {
        let sel = parse(json!({"or": {"host": "devbox", "file": "~/marker"}}));
        let Selector::Or(children) = sel else {
            panic!("expected Or");
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn nested_composition_parses() {
        let sel = parse(json!({
            "and": {
                "host": ["devbox", ".example.com"],
                "not": {"file": "~/.work-disabled"}
            }
        }));
        let Selector::And(children) = sel else {
            panic!("expected And");
        };
        assert!(children.iter().any(|c| matches!(c, Selector::Not(_))));
    }

    #[test]
    fn unknown_key_is_an_error_naming_the_key() {
        let err = Selector::parse(&json!({"cmd": "test -f x"})).unwrap_err();
        assert!(matches!(err, SelectorError::UnknownKey(ref k) if k == "cmd"));
    }

    #[test]
    fn unknown_key_nested_in_and_is_an_error() {
        let err = Selector::parse(&json!({"and": {"hots": "devbox"}})).unwrap_err();
        assert!(matches!(err, SelectorError::UnknownKey(ref k) if k == "hots"));
    }

    #[test]
    fn not_with_two_children_is_an_error() {
        let err =
            Selector::parse(&json!({"not": {"host": "a", "file": "b"}})).unwrap_err();
        assert!(matches!(err, SelectorError::NotArity));
    }

    #[test]
    fn not_with_empty_body_is_an_error() {
        let err = Selector::parse(&json!({"not": {}})).unwrap_err();
        assert!(matches!(err, SelectorError::NotArity));
    }

    #[test]
    fn file_with_non_string_value_is_an_error() {
        let err = Selector::parse(&json!({"file": 42})).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidValue { ref key, .. } if key == "file"));
    }

    #[test]
    fn host_with_non_string_array_item_is_an_error() {
        let err = Selector::parse(&json!({"host": ["ok", 42]})).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidValue { ref key, .. } if key == "host"));
    }

    #[test]
    fn and_with_string_body_is_an_error() {
        let err = Selector::parse(&json!({"and": "nope"})).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidValue { ref key, .. } if key == "and"));
    }

    // -----------------------------------------------------------------------
    // Evaluation: logical identities
    // -----------------------------------------------------------------------

    #[test]
    fn empty_and_is_true() {
        let ctx = FakeContext::new();
        assert!(Selector::And(vec![]).evaluate(&ctx));
    }

    #[test]
    fn empty_or_is_false() {
        let ctx = FakeContext::new();
        assert!(!Selector::Or(vec![]).evaluate(&ctx));
    }

    #[test]
    fn not_inverts_its_child() {
        let ctx = FakeContext::new().with_hostname("devbox");
        let truthy = Selector::Host(vec!["devbox".to_string()]);
        let falsy = Selector::Host(vec!["other".to_string()]);
        assert_eq!(
            Selector::Not(Box::new(truthy.clone())).evaluate(&ctx),
            !truthy.evaluate(&ctx)
        );
        assert_eq!(
            Selector::Not(Box::new(falsy.clone())).evaluate(&ctx),
            !falsy.evaluate(&ctx)
        );
    }

    #[test]
    fn and_requires_all_children() {
        let ctx = FakeContext::new().with_hostname("devbox").with_username("sam");
        let both = parse(json!({"and": {"host": "devbox", "user": "sam"}}));
        let one = parse(json!({"and": {"host": "devbox", "user": "other"}}));
        assert!(both.evaluate(&ctx));
        assert!(!one.evaluate(&ctx));
    }

    #[test]
    fn or_requires_any_child() {
        let ctx = FakeContext::new().with_hostname("devbox").with_username("sam");
        let one = parse(json!({"or": {"host": "nope", "user": "sam"}}));
        let none = parse(json!({"or": {"host": "nope", "user": "other"}}));
        assert!(one.evaluate(&ctx));
        assert!(!none.evaluate(&ctx));
    }

    // -----------------------------------------------------------------------
    // Evaluation: host matching
    // -----------------------------------------------------------------------

    #[test]
    fn host_exact_match() {
        let ctx = FakeContext::new().with_hostname("devbox");
        assert!(parse(json!({"host": "devbox"})).evaluate(&ctx));
        assert!(!parse(json!({"host": "devbox2"})).evaluate(&ctx));
    }

    #[test]
    fn host_match_is_case_sensitive() {
        let ctx = FakeContext::new().with_hostname("devbox");
        assert!(!parse(json!({"host": "Devbox"})).evaluate(&ctx));
    }

    #[test]
    fn host_suffix_matches_domain_with_dot_boundary() {
        let ctx = FakeContext::new().with_hostname("foo.example.com");
        assert!(parse(json!({"host": ".example.com"})).evaluate(&ctx));
    }

    #[test]
    fn host_suffix_does_not_match_bare_domain() {
        let ctx = FakeContext::new().with_hostname("example.com");
        assert!(!parse(json!({"host": ".example.com"})).evaluate(&ctx));
    }

    #[test]
    fn host_short_name_matches_fqdn() {
        let ctx = FakeContext::new().with_hostname("devbox.example.com");
        assert!(parse(json!({"host": "devbox"})).evaluate(&ctx));
    }

    #[test]
    fn host_wildcard_matches_anything() {
        let ctx = FakeContext::new().with_hostname("whatever");
        assert!(parse(json!({"host": "*"})).evaluate(&ctx));
    }

    #[test]
    fn host_array_matches_any_pattern() {
        let ctx = FakeContext::new().with_hostname("laptop");
        assert!(parse(json!({"host": ["devbox", "laptop"]})).evaluate(&ctx));
        assert!(!parse(json!({"host": ["devbox", "tower"]})).evaluate(&ctx));
    }

    // -----------------------------------------------------------------------
    // Evaluation: user matching
    // -----------------------------------------------------------------------

    #[test]
    fn user_exact_match_only() {
        let ctx = FakeContext::new().with_username("sam");
        assert!(parse(json!({"user": "sam"})).evaluate(&ctx));
        assert!(!parse(json!({"user": "samantha"})).evaluate(&ctx));
        assert!(parse(json!({"user": ["root", "sam"]})).evaluate(&ctx));
    }

    // -----------------------------------------------------------------------
    // Evaluation: file/dir existence and expansion
    // -----------------------------------------------------------------------

    #[test]
    fn file_selector_checks_registered_file() {
        let ctx = FakeContext::new()
            .with_home("/home/sam")
            .with_file("/home/sam/.gitconfig");
        assert!(parse(json!({"file": "~/.gitconfig"})).evaluate(&ctx));
        assert!(!parse(json!({"file": "~/.zshrc"})).evaluate(&ctx));
    }

    #[test]
    fn dir_selector_checks_registered_dir() {
        let ctx = FakeContext::new().with_home("/home/sam").with_dir("/home/sam/git");
        assert!(parse(json!({"dir": "~/git"})).evaluate(&ctx));
        assert!(!parse(json!({"dir": "~/code"})).evaluate(&ctx));
    }

    #[test]
    fn file_selector_expands_env_vars() {
        let ctx = FakeContext::new()
            .with_env("WORKDIR", "/srv/work")
            .with_file("/srv/work/marker");
        assert!(parse(json!({"file": "$WORKDIR/marker"})).evaluate(&ctx));
    }

    #[test]
    fn unset_variable_evaluates_false_not_error() {
        let ctx = FakeContext::new();
        assert!(!parse(json!({"file": "$NOPE/marker"})).evaluate(&ctx));
        assert!(!parse(json!({"dir": "$NOPE"})).evaluate(&ctx));
        // and the negation is therefore true
        assert!(parse(json!({"not": {"file": "$NOPE/marker"}})).evaluate(&ctx));
    }

    #[test]
    fn dir_selector_is_not_satisfied_by_a_file() {
        let ctx = FakeContext::new().with_file("/home/tester/thing");
        assert!(!parse(json!({"dir": "/home/tester/thing"})).evaluate(&ctx));
    }
}
