//! Version pattern templates
//!
//! A template such as `release/<major>[.<minor>]` or
//! `[v]<major>.<minor>[.<patch>]` is compiled once into an anchored,
//! case-insensitive regex for matching, and kept as a token tree so release
//! mode can render a name for a new version.
//!
//! Syntax:
//! - `<major>`, `<minor>`, `<patch>`: a run of digits captured into that field
//! - `[ ... ]`: optional group, may nest
//! - `*`: any run of characters
//! - `\x`: literal `x`
//!
//! Everything else is literal text.

use std::fmt;

use regex::Regex;

use crate::error::{GrellyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Major,
    Minor,
    Patch,
}

impl Placeholder {
    fn name(self) -> &'static str {
        match self {
            Placeholder::Major => "major",
            Placeholder::Minor => "minor",
            Placeholder::Patch => "patch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Placeholder),
    Wildcard,
    Optional(Vec<Token>),
}

/// Numbers captured from a string that matched a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captured {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

/// A compiled version pattern
#[derive(Debug, Clone)]
pub struct VersionPattern {
    template: String,
    tokens: Vec<Token>,
    regex: Regex,
}

impl VersionPattern {
    /// Compile a pattern template
    ///
    /// # Returns
    /// * `Ok(VersionPattern)` - The compiled pattern
    /// * `Err(GrellyError::Config)` - If the template is malformed
    pub fn new(template: &str) -> Result<Self> {
        if template.trim().is_empty() {
            return Err(GrellyError::config("Pattern must not be empty"));
        }

        let tokens = tokenize(template)?;

        let mut seen = Vec::new();
        collect_placeholders(&tokens, &mut seen);
        for field in [Placeholder::Major, Placeholder::Minor, Placeholder::Patch] {
            if seen.iter().filter(|p| **p == field).count() > 1 {
                return Err(GrellyError::config(format!(
                    "Pattern '{}' uses <{}> more than once",
                    template,
                    field.name()
                )));
            }
        }
        if !seen.contains(&Placeholder::Major) {
            return Err(GrellyError::config(format!(
                "Pattern '{}' must contain a <major> placeholder",
                template
            )));
        }

        let mut body = String::new();
        write_regex(&tokens, &mut body);
        let regex = Regex::new(&format!("(?i)^{}$", body)).map_err(|e| {
            GrellyError::config(format!("Pattern '{}' is invalid: {}", template, e))
        })?;

        Ok(VersionPattern {
            template: template.to_string(),
            tokens,
            regex,
        })
    }

    /// The template this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Match a whole input string and extract its version numbers.
    ///
    /// Returns `None` when the input does not match, or when a captured
    /// number does not fit in a `u64`.
    pub fn parse(&self, input: &str) -> Option<Captured> {
        let caps = self.regex.captures(input.trim())?;

        let major = caps.name("major")?.as_str().parse::<u64>().ok()?;
        let minor = match caps.name("minor") {
            Some(m) => Some(m.as_str().parse::<u64>().ok()?),
            None => None,
        };
        let patch = match caps.name("patch") {
            Some(m) => Some(m.as_str().parse::<u64>().ok()?),
            None => None,
        };

        Some(Captured {
            major,
            minor,
            patch,
        })
    }

    /// Whether a string matches this pattern
    pub fn matches(&self, input: &str) -> bool {
        self.parse(input).is_some()
    }

    /// Render a name for the given version numbers.
    ///
    /// Optional groups are emitted only when every placeholder inside them has
    /// a value. A required placeholder without a value renders as `0`.
    /// Example: pattern=`[v]<major>.<minor>[.<patch>]`, (2, Some(4), None) -> `v2.4`
    pub fn render(&self, major: u64, minor: Option<u64>, patch: Option<u64>) -> Result<String> {
        let values = Values {
            major,
            minor,
            patch,
        };
        let mut out = String::new();
        render_tokens(&self.tokens, &values, &mut out).map_err(|_| {
            GrellyError::config(format!(
                "Pattern '{}' contains a wildcard and cannot name a release",
                self.template
            ))
        })?;
        Ok(out)
    }
}

impl fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}

fn tokenize(template: &str) -> Result<Vec<Token>> {
    let mut stack: Vec<Vec<Token>> = vec![Vec::new()];
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => literal.push(escaped),
                None => {
                    return Err(GrellyError::config(format!(
                        "Pattern '{}' ends with a dangling escape",
                        template
                    )))
                }
            },
            '<' => {
                flush_literal(&mut literal, &mut stack);
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(GrellyError::config(format!(
                                "Pattern '{}' has an unterminated placeholder",
                                template
                            )))
                        }
                    }
                }
                let field = match name.as_str() {
                    "major" => Placeholder::Major,
                    "minor" => Placeholder::Minor,
                    "patch" => Placeholder::Patch,
                    other => {
                        return Err(GrellyError::config(format!(
                            "Pattern '{}' has unknown placeholder <{}>",
                            template, other
                        )))
                    }
                };
                push_token(&mut stack, Token::Field(field));
            }
            '[' => {
                flush_literal(&mut literal, &mut stack);
                stack.push(Vec::new());
            }
            ']' => {
                flush_literal(&mut literal, &mut stack);
                if stack.len() < 2 {
                    return Err(GrellyError::config(format!(
                        "Pattern '{}' has an unmatched ']'",
                        template
                    )));
                }
                let group = stack.pop().unwrap_or_default();
                if group.is_empty() {
                    return Err(GrellyError::config(format!(
                        "Pattern '{}' has an empty optional group",
                        template
                    )));
                }
                push_token(&mut stack, Token::Optional(group));
            }
            '*' => {
                flush_literal(&mut literal, &mut stack);
                push_token(&mut stack, Token::Wildcard);
            }
            other => literal.push(other),
        }
    }

    flush_literal(&mut literal, &mut stack);
    if stack.len() != 1 {
        return Err(GrellyError::config(format!(
            "Pattern '{}' has an unclosed '['",
            template
        )));
    }

    Ok(stack.pop().unwrap_or_default())
}

fn push_token(stack: &mut [Vec<Token>], token: Token) {
    if let Some(top) = stack.last_mut() {
        top.push(token);
    }
}

fn flush_literal(literal: &mut String, stack: &mut [Vec<Token>]) {
    if !literal.is_empty() {
        push_token(stack, Token::Literal(std::mem::take(literal)));
    }
}

fn collect_placeholders(tokens: &[Token], out: &mut Vec<Placeholder>) {
    for token in tokens {
        match token {
            Token::Field(p) => out.push(*p),
            Token::Optional(inner) => collect_placeholders(inner, out),
            Token::Literal(_) | Token::Wildcard => {}
        }
    }
}

fn write_regex(tokens: &[Token], out: &mut String) {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(&regex::escape(text)),
            Token::Field(p) => out.push_str(&format!("(?P<{}>[0-9]+)", p.name())),
            Token::Wildcard => out.push_str(".*?"),
            Token::Optional(inner) => {
                out.push_str("(?:");
                write_regex(inner, out);
                out.push_str(")?");
            }
        }
    }
}

struct Values {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
}

impl Values {
    fn get(&self, p: Placeholder) -> Option<u64> {
        match p {
            Placeholder::Major => Some(self.major),
            Placeholder::Minor => self.minor,
            Placeholder::Patch => self.patch,
        }
    }
}

struct WildcardInRender;

fn render_tokens(
    tokens: &[Token],
    values: &Values,
    out: &mut String,
) -> std::result::Result<(), WildcardInRender> {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Field(p) => out.push_str(&values.get(*p).unwrap_or(0).to_string()),
            Token::Wildcard => return Err(WildcardInRender),
            Token::Optional(inner) => {
                let complete = inner.iter().all(|t| match t {
                    Token::Field(p) => values.get(*p).is_some(),
                    _ => true,
                });
                if complete {
                    render_tokens(inner, values, out)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_pattern_with_optional_patch() {
        let pattern = VersionPattern::new("v<major>.<minor>[.<patch>]").unwrap();
        assert_eq!(
            pattern.parse("v2.3"),
            Some(Captured {
                major: 2,
                minor: Some(3),
                patch: None
            })
        );
        assert_eq!(
            pattern.parse("v2.3.7"),
            Some(Captured {
                major: 2,
                minor: Some(3),
                patch: Some(7)
            })
        );
        assert!(!pattern.matches("2.3"));
        assert!(!pattern.matches("v2"));
        assert!(!pattern.matches("v2.3-rc1"));
    }

    #[test]
    fn test_optional_prefix() {
        let pattern = VersionPattern::new("[v]<major>.<minor>[.<patch>]").unwrap();
        assert!(pattern.matches("v1.0"));
        assert!(pattern.matches("1.0.4"));
        assert!(pattern.matches("V1.0"));
    }

    #[test]
    fn test_branch_pattern() {
        let pattern = VersionPattern::new("release/<major>[.<minor>]").unwrap();
        let captured = pattern.parse("release/17.0").unwrap();
        assert_eq!(captured.major, 17);
        assert_eq!(captured.minor, Some(0));

        let captured = pattern.parse("release/17").unwrap();
        assert_eq!(captured.minor, None);

        assert!(!pattern.matches("main"));
        assert!(!pattern.matches("feature/release/17"));
    }

    #[test]
    fn test_wildcard_and_escape() {
        let pattern = VersionPattern::new(r"*release/<major>\*").unwrap();
        assert!(pattern.matches("origin/release/3*"));
        assert!(!pattern.matches("origin/release/3"));
    }

    #[test]
    fn test_release_commit_pattern() {
        let pattern = VersionPattern::new("release: <major>.<minor>.<patch>").unwrap();
        let captured = pattern.parse("Release: 4.1.0").unwrap();
        assert_eq!((captured.major, captured.minor), (4, Some(1)));
        assert!(!pattern.matches("release notes for 4.1.0"));
    }

    #[test]
    fn test_overflowing_number_is_no_match() {
        let pattern = VersionPattern::new("v<major>.<minor>").unwrap();
        assert!(pattern.parse("v99999999999999999999999.1").is_none());
    }

    #[test]
    fn test_malformed_patterns() {
        for bad in [
            "",
            "v<minor>",
            "v<major>.<major>",
            "v<major>.<build>",
            "v<major",
            "v<major>[.<minor>",
            "v<major>].<minor>",
            "v<major>[]",
            "v<major>\\",
        ] {
            let result = VersionPattern::new(bad);
            assert!(
                matches!(result, Err(GrellyError::Config(_))),
                "pattern {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_render() {
        let tag = VersionPattern::new("[v]<major>.<minor>[.<patch>]").unwrap();
        assert_eq!(tag.render(2, Some(4), None).unwrap(), "v2.4");
        assert_eq!(tag.render(2, Some(4), Some(1)).unwrap(), "v2.4.1");

        let message = VersionPattern::new("release: <major>.<minor>.<patch>").unwrap();
        assert_eq!(message.render(2, Some(4), None).unwrap(), "release: 2.4.0");
    }

    #[test]
    fn test_render_rejects_wildcard() {
        let pattern = VersionPattern::new("*/v<major>").unwrap();
        assert!(matches!(
            pattern.render(1, None, None),
            Err(GrellyError::Config(_))
        ));
    }
}
