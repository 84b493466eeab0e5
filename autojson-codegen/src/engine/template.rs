//! Template loading and hole validation.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[expect(
    clippy::expect_used,
    reason = "hole pattern is a compile-time constant"
)]
static HOLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\s*(.*?)\s*\*/").expect("hole pattern must compile"));

/// Errors raised while loading a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A comment in the template does not name a known hole.
    #[error("unknown template hole '{name}' on line {line}")]
    UnknownHole {
        /// The comment text, trimmed.
        name: String,
        /// One-based line the hole starts on.
        line: usize,
    },
}

/// A named placeholder in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hole {
    /// `list of declarations`
    Declarations,
    /// `init`
    Init,
    /// `serialize all members`
    SerializeAllMembers,
    /// `change state`
    ChangeState,
    /// `reap error`
    ReapError,
    /// `get member name`
    GetMemberName,
    /// `validation`
    Validation,
    /// `reset flags`
    ResetFlags,
    /// `handle unknown key`
    HandleUnknownKey,
    /// `TypeName`
    TypeName,
    /// `Writer`
    Writer,
    /// `forward <call> to members`, carrying the call text.
    Forward(String),
}

impl Hole {
    /// Resolves a hole name, or `None` if it names nothing known.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let hole = match name {
            "list of declarations" => Self::Declarations,
            "init" => Self::Init,
            "serialize all members" => Self::SerializeAllMembers,
            "change state" => Self::ChangeState,
            "reap error" => Self::ReapError,
            "get member name" => Self::GetMemberName,
            "validation" => Self::Validation,
            "reset flags" => Self::ResetFlags,
            "handle unknown key" => Self::HandleUnknownKey,
            "TypeName" => Self::TypeName,
            "Writer" => Self::Writer,
            other => {
                let call = other.strip_prefix("forward ")?.strip_suffix(" to members")?;
                if call.is_empty() || call.trim() != call {
                    return None;
                }
                Self::Forward(call.to_owned())
            }
        };
        Some(hole)
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output unchanged.
    Literal(String),
    /// A placeholder replaced by a generated fragment.
    Hole(Hole),
}

/// A parsed, validated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Splits `text` into literal runs and holes.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownHole`] for the first comment whose
    /// text is not a known hole name.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for captures in HOLE.captures_iter(text) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let hole = Hole::from_name(name.as_str()).ok_or_else(|| TemplateError::UnknownHole {
                name: name.as_str().to_owned(),
                line: line_of(text, whole.start()),
            })?;
            if let Some(literal) = text.get(cursor..whole.start()).filter(|s| !s.is_empty()) {
                segments.push(Segment::Literal(literal.to_owned()));
            }
            segments.push(Segment::Hole(hole));
            cursor = whole.end();
        }
        if let Some(rest) = text.get(cursor..).filter(|s| !s.is_empty()) {
            segments.push(Segment::Literal(rest.to_owned()));
        }
        Ok(Self { segments })
    }

    /// Literal runs and holes in template order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Holes in template order.
    pub fn holes(&self) -> impl Iterator<Item = &Hole> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Hole(hole) => Some(hole),
            Segment::Literal(_) => None,
        })
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(0, |before| before.matches('\n').count())
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("init", Hole::Init)]
    #[case("TypeName", Hole::TypeName)]
    #[case("list of declarations", Hole::Declarations)]
    #[case("forward Int(i) to members", Hole::Forward("Int(i)".to_owned()))]
    #[case(
        "forward StartObject() to members",
        Hole::Forward("StartObject()".to_owned())
    )]
    #[case(
        "forward String(str, length, copy) to members",
        Hole::Forward("String(str, length, copy)".to_owned())
    )]
    fn resolves_known_names(#[case] name: &str, #[case] expected: Hole) {
        assert_eq!(Hole::from_name(name), Some(expected));
    }

    #[rstest]
    #[case("typename")]
    #[case("forward  to members")]
    #[case("forward   Int(i) to members")]
    #[case("forward Int(i)  to members")]
    #[case("forward x to member")]
    #[case("copyright 2014")]
    fn rejects_unknown_names(#[case] name: &str) {
        assert_eq!(Hole::from_name(name), None);
    }

    #[test]
    fn splits_literals_and_holes() {
        let template = Template::parse("a /* init */b/*TypeName*/").expect("valid template");
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("a ".to_owned()),
                Segment::Hole(Hole::Init),
                Segment::Literal("b".to_owned()),
                Segment::Hole(Hole::TypeName),
            ]
        );
    }

    #[test]
    fn unknown_hole_reports_line() {
        let err = Template::parse("one\ntwo /* init */\n/* bogus */\n").expect_err("bogus hole");
        assert_eq!(
            err,
            TemplateError::UnknownHole {
                name: "bogus".to_owned(),
                line: 3,
            }
        );
    }

    #[test]
    fn text_without_holes_is_one_literal() {
        let template = Template::parse("int x;\n").expect("valid template");
        assert_eq!(template.holes().count(), 0);
        assert_eq!(template.segments().len(), 1);
    }
}
