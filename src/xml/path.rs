//! ElementTree-style element paths.
//!
//! Supported syntax, evaluated relative to an element:
//!
//! | step            | selects                                           |
//! |-----------------|---------------------------------------------------|
//! | `tag`           | child elements with that tag (`{uri}local` too)   |
//! | `{*}local`      | child elements with that local name, any namespace|
//! | `*`             | all child elements                                |
//! | `.`             | the current element                               |
//! | `//`            | all descendants, combined with the next step      |
//! | `[@attr]`       | filter: attribute present                         |
//! | `[@attr='v']`   | filter: attribute equals `v` (either quote style) |
//!
//! Absolute paths and `..` are rejected.

use super::{split_clark, XmlElement, XmlError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    AnyNamespace(String),
    Exact(String),
}

impl NameTest {
    fn matches(&self, element: &XmlElement) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::AnyNamespace(local) => split_clark(&element.tag).1 == local,
            NameTest::Exact(tag) => &element.tag == tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    HasAttribute(String),
    AttributeEquals(String, String),
}

impl Predicate {
    fn matches(&self, element: &XmlElement) -> bool {
        match self {
            Predicate::HasAttribute(name) => element.attributes.contains_key(name),
            Predicate::AttributeEquals(name, value) => {
                element.attribute(name) == Some(value.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Current,
    Descendants,
    Select {
        name: NameTest,
        predicates: Vec<Predicate>,
    },
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPath {
    steps: Vec<Step>,
}

impl ElementPath {
    /// Compiles a path expression.
    pub fn parse(path: &str) -> Result<Self, XmlError> {
        let invalid = |reason: &str| XmlError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("empty path"));
        }
        if path.starts_with('/') {
            return Err(invalid("cannot use absolute path on element"));
        }

        let segments = split_segments(path).map_err(|reason| invalid(reason))?;
        let mut steps = Vec::with_capacity(segments.len());
        for segment in segments {
            let step = match segment {
                "" => {
                    if matches!(steps.last(), Some(Step::Descendants)) {
                        return Err(invalid("more than two consecutive slashes"));
                    }
                    Step::Descendants
                }
                "." => Step::Current,
                ".." => return Err(invalid("parent steps are not supported")),
                other => parse_select(other).map_err(|reason| invalid(reason))?,
            };
            steps.push(step);
        }

        if matches!(steps.last(), Some(Step::Descendants)) {
            return Err(invalid("path must not end with a slash"));
        }

        Ok(Self { steps })
    }

    /// Evaluates the path against `root`, returning matches in document order
    /// without duplicates.
    pub fn select<'a>(&self, root: &'a XmlElement) -> Vec<&'a XmlElement> {
        let mut current: Vec<&'a XmlElement> = vec![root];
        let mut descend = false;

        for step in &self.steps {
            match step {
                Step::Current => {}
                Step::Descendants => descend = true,
                Step::Select { name, predicates } => {
                    let mut next: Vec<&'a XmlElement> = Vec::new();
                    for element in &current {
                        let candidates: Vec<&'a XmlElement> = if descend {
                            element.descendants()
                        } else {
                            element.children.iter().collect()
                        };
                        for candidate in candidates {
                            if name.matches(candidate)
                                && predicates.iter().all(|p| p.matches(candidate))
                                && !next.iter().any(|seen| std::ptr::eq(*seen, candidate))
                            {
                                next.push(candidate);
                            }
                        }
                    }
                    current = next;
                    descend = false;
                }
            }
        }

        current
    }
}

/// Splits on `/` outside `{...}` namespace braces, predicates and quotes.
fn split_segments(path: &str) -> Result<Vec<&str>, &'static str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_braces = false;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;

    for (i, ch) in path.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' if in_brackets => quote = Some(ch),
            '{' if !in_brackets => in_braces = true,
            '}' if in_braces => in_braces = false,
            '[' if !in_braces => in_brackets = true,
            ']' if in_brackets => in_brackets = false,
            '/' if !in_braces && !in_brackets => {
                segments.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_braces {
        return Err("unterminated namespace");
    }
    if in_brackets || quote.is_some() {
        return Err("unterminated predicate");
    }
    segments.push(&path[start..]);
    Ok(segments)
}

fn parse_select(segment: &str) -> Result<Step, &'static str> {
    let name_end = if segment.starts_with('{') {
        let close = segment.find('}').ok_or("unterminated namespace")?;
        segment[close..].find('[').map_or(segment.len(), |i| close + i)
    } else {
        segment.find('[').unwrap_or(segment.len())
    };

    let name = match &segment[..name_end] {
        "" => return Err("missing tag name"),
        "*" => NameTest::Any,
        n => match n.strip_prefix("{*}") {
            Some(local) if !local.is_empty() => NameTest::AnyNamespace(local.to_string()),
            Some(_) => return Err("missing tag name"),
            None => NameTest::Exact(n.to_string()),
        },
    };

    let mut predicates = Vec::new();
    let mut rest = &segment[name_end..];
    while !rest.is_empty() {
        let body = rest.strip_prefix('[').ok_or("unexpected text after predicate")?;
        let close = find_predicate_end(body).ok_or("unterminated predicate")?;
        predicates.push(parse_predicate(&body[..close])?);
        rest = &body[close + 1..];
    }

    Ok(Step::Select { name, predicates })
}

fn find_predicate_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_predicate(predicate: &str) -> Result<Predicate, &'static str> {
    let predicate = predicate.trim();
    let attr = predicate
        .strip_prefix('@')
        .ok_or("only attribute predicates are supported")?;

    match attr.split_once('=') {
        None => {
            let name = attr.trim();
            if name.is_empty() {
                return Err("missing attribute name");
            }
            Ok(Predicate::HasAttribute(name.to_string()))
        }
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                return Err("missing attribute name");
            }
            let unquoted = value
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
                .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
                .ok_or("attribute value must be quoted")?;
            Ok(Predicate::AttributeEquals(
                name.to_string(),
                unquoted.to_string(),
            ))
        }
    }
}
