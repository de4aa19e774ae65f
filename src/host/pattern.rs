//! Path pattern module
//!
//! Parses route patterns such as `/teams/{team_id:int}` and matches request paths against them.
//!
//! Supported segment forms:
//! - Literal: `teams`
//! - `{name}` or `{name:str}`: any single non-empty segment
//! - `{name:int}`: ASCII digits only, parsed as `u64`
//! - `{name:path}`: the rest of the path, slashes included (last segment only)
//!
//! Request paths are percent-decoded segment by segment before matching, so literals,
//! integer ids and captured values all see the decoded text.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::fmt;

/// Converter applied to a typed path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Str,
    Int,
    Path,
}

impl Converter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "path" => Some(Self::Path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, converter: Converter },
}

/// Value captured by a path parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(u64),
    Path(String),
}

impl ParamValue {
    /// Raw text of the captured value
    pub fn as_text(&self) -> String {
        match self {
            Self::Str(s) | Self::Path(s) => s.clone(),
            Self::Int(n) => n.to_string(),
        }
    }
}

/// Parameters captured by a successful match, in pattern order
pub type PathParams = Vec<(String, ParamValue)>;

/// Look up a captured parameter by name
pub fn param<'a>(params: &'a PathParams, name: &str) -> Option<&'a ParamValue> {
    params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

/// Pattern parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    MissingLeadingSlash(String),
    EmptySegment(String),
    MalformedParam { pattern: String, segment: String },
    UnknownConverter { pattern: String, converter: String },
    DuplicateParam { pattern: String, name: String },
    PathNotLast(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash(p) => write!(f, "pattern '{p}' must start with '/'"),
            Self::EmptySegment(p) => write!(f, "pattern '{p}' contains an empty segment"),
            Self::MalformedParam { pattern, segment } => {
                write!(f, "pattern '{pattern}' has malformed segment '{segment}'")
            }
            Self::UnknownConverter { pattern, converter } => {
                write!(f, "pattern '{pattern}' uses unknown converter '{converter}'")
            }
            Self::DuplicateParam { pattern, name } => {
                write!(f, "pattern '{pattern}' declares parameter '{name}' twice")
            }
            Self::PathNotLast(p) => {
                write!(f, "pattern '{p}' has a path parameter before the last segment")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Compiled route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern string
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let parts: Vec<&str> = rest.split('/').collect();
            let last = parts.len() - 1;
            for (i, part) in parts.into_iter().enumerate() {
                let segment = parse_segment(raw, part)?;
                if let Segment::Param { name, converter } = &segment {
                    if *converter == Converter::Path && i != last {
                        return Err(PatternError::PathNotLast(raw.to_string()));
                    }
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param { name: n, .. } if n == name))
                    {
                        return Err(PatternError::DuplicateParam {
                            pattern: raw.to_string(),
                            name: name.clone(),
                        });
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Original pattern text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning captured parameters on success.
    ///
    /// A segment that does not decode to valid UTF-8 never matches.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<Cow<'_, str>> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/')
                .map(|part| percent_decode_str(part).decode_utf8().ok())
                .collect::<Option<_>>()?
        };

        let mut params = PathParams::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(lit) => {
                    if !matches!(parts.get(i), Some(part) if part == lit.as_str()) {
                        return None;
                    }
                }
                Segment::Param { name, converter } => match converter {
                    Converter::Path => {
                        let tail = parts.get(i..)?.join("/");
                        if tail.is_empty() {
                            return None;
                        }
                        params.push((name.clone(), ParamValue::Path(tail)));
                        return Some(params);
                    }
                    Converter::Int => {
                        let part = parts.get(i)?;
                        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                            return None;
                        }
                        let value = part.parse::<u64>().ok()?;
                        params.push((name.clone(), ParamValue::Int(value)));
                    }
                    Converter::Str => {
                        let part = parts.get(i)?;
                        if part.is_empty() {
                            return None;
                        }
                        params.push((name.clone(), ParamValue::Str(part.to_string())));
                    }
                },
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(raw: &str, part: &str) -> Result<Segment, PatternError> {
    if part.is_empty() {
        return Err(PatternError::EmptySegment(raw.to_string()));
    }

    let malformed = || PatternError::MalformedParam {
        pattern: raw.to_string(),
        segment: part.to_string(),
    };

    let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) else {
        if part.contains(['{', '}']) {
            return Err(malformed());
        }
        return Ok(Segment::Literal(part.to_string()));
    };

    let (name, converter) = match inner.split_once(':') {
        Some((name, conv)) => {
            let converter =
                Converter::parse(conv).ok_or_else(|| PatternError::UnknownConverter {
                    pattern: raw.to_string(),
                    converter: conv.to_string(),
                })?;
            (name, converter)
        }
        None => (inner, Converter::Str),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed());
    }

    Ok(Segment::Param {
        name: name.to_string(),
        converter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_matches_only_root() {
        let p = PathPattern::parse("/").unwrap();
        assert_eq!(p.matches("/"), Some(vec![]));
        assert!(p.matches("/login").is_none());
        assert!(p.matches("").is_none());
    }

    #[test]
    fn test_literal_exact() {
        let p = PathPattern::parse("/scoreboard").unwrap();
        assert!(p.matches("/scoreboard").is_some());
        assert!(p.matches("/scoreboard/").is_none());
        assert!(p.matches("/scoreboard/top").is_none());
        assert!(p.matches("/Scoreboard").is_none());
    }

    #[test]
    fn test_int_param() {
        let p = PathPattern::parse("/teams/{team_id:int}").unwrap();
        assert_eq!(
            p.matches("/teams/42"),
            Some(vec![("team_id".to_string(), ParamValue::Int(42))])
        );
        assert!(p.matches("/teams/abc").is_none());
        assert!(p.matches("/teams/-1").is_none());
        assert!(p.matches("/teams/4a").is_none());
        assert!(p.matches("/teams/").is_none());
        assert!(p.matches("/teams").is_none());
        assert!(p.matches("/teams/42/members").is_none());
        // Overflowing u64 is not a match
        assert!(p.matches("/teams/99999999999999999999999").is_none());
    }

    #[test]
    fn test_str_param() {
        let p = PathPattern::parse("/users/{name}").unwrap();
        assert_eq!(
            p.matches("/users/alice"),
            Some(vec![("name".to_string(), ParamValue::Str("alice".to_string()))])
        );
        assert!(p.matches("/users/alice/bob").is_none());
    }

    #[test]
    fn test_path_param_takes_rest() {
        let p = PathPattern::parse("/themes/Arcade/static/{filename:path}").unwrap();
        let params = p.matches("/themes/Arcade/static/assets/main.js").unwrap();
        assert_eq!(
            param(&params, "filename"),
            Some(&ParamValue::Path("assets/main.js".to_string()))
        );
        assert!(p.matches("/themes/Arcade/static/").is_none());
        assert!(p.matches("/themes/Arcade/static").is_none());
    }

    #[test]
    fn test_segments_are_percent_decoded() {
        let teams = PathPattern::parse("/teams/{team_id:int}").unwrap();
        assert_eq!(
            teams.matches("/teams/%34%32"),
            Some(vec![("team_id".to_string(), ParamValue::Int(42))])
        );
        assert!(teams.matches("/%74eams/7").is_some());
        assert!(teams.matches("/teams/%2D1").is_none());

        let assets = PathPattern::parse("/themes/Arcade/static/{filename:path}").unwrap();
        let params = assets
            .matches("/themes/Arcade/static/assets/my%20file.js")
            .unwrap();
        assert_eq!(
            param(&params, "filename"),
            Some(&ParamValue::Path("assets/my file.js".to_string()))
        );
        // Traversal stays visible after decoding
        let params = assets.matches("/themes/Arcade/static/%2E%2E/secret").unwrap();
        assert_eq!(params[0].1.as_text(), "../secret");
    }

    #[test]
    fn test_invalid_utf8_never_matches() {
        let users = PathPattern::parse("/users/{name}").unwrap();
        assert!(users.matches("/users/%FF").is_none());
        assert!(users.matches("/users/%C3%A9").is_some());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PathPattern::parse("teams"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathPattern::parse("/teams//x"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            PathPattern::parse("/teams/{id"),
            Err(PatternError::MalformedParam { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/teams/{id:uuid}"),
            Err(PatternError::UnknownConverter { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/a/{id}/b/{id}"),
            Err(PatternError::DuplicateParam { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/{rest:path}/tail"),
            Err(PatternError::PathNotLast(_))
        ));
    }

    #[test]
    fn test_param_value_text() {
        assert_eq!(ParamValue::Int(7).as_text(), "7");
        assert_eq!(ParamValue::Path("a/b".to_string()).as_text(), "a/b");
    }
}
