//! Endpoint descriptors: a method plus a URL template with `:name`
//! placeholders.

use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;
use crate::http::HttpMethod;

/// A parsed endpoint such as `GET /orgs/:org/repos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: HttpMethod,
    url: String,
}

impl Endpoint {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Parse the `["METHOD" WS] path` shorthand.
    ///
    /// A single token is a path and the method defaults to GET. The method
    /// token is matched case-insensitively.
    pub fn parse(route: &str) -> Result<Self, BuildError> {
        let route = route.trim();
        match route.split_once(char::is_whitespace) {
            Some((method, path)) => Ok(Self::new(method.parse()?, path.trim_start())),
            None => Ok(Self::new(HttpMethod::Get, route)),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the template carries its own scheme and host.
    pub fn is_absolute(&self) -> bool {
        is_absolute_url(&self.url)
    }

    /// Placeholder names in template order, without the leading `:`.
    pub fn placeholders(&self) -> Vec<&str> {
        template_tokens(&self.url)
            .filter_map(|token| match token {
                Token::Placeholder(name) => Some(name),
                Token::Literal(_) => None,
            })
            .collect()
    }
}

impl FromStr for Endpoint {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

pub(crate) fn is_absolute_url(url: &str) -> bool {
    url::Url::parse(url).is_ok_and(|u| u.has_host())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal runs and `:identifier` placeholders.
///
/// An identifier starts with an ASCII letter or `_`, so `://` and `:8080`
/// stay literal.
pub(crate) fn template_tokens(template: &str) -> impl Iterator<Item = Token<'_>> {
    let bytes = template.as_bytes();
    let authority = authority_end(template);
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos < authority {
            pos = authority;
            return Some(Token::Literal(&template[..authority]));
        }
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        if bytes[pos] == b':' && bytes.get(pos + 1).is_some_and(|b| is_ident_start(*b)) {
            pos += 2;
            while pos < bytes.len() && is_ident_continue(bytes[pos]) {
                pos += 1;
            }
            return Some(Token::Placeholder(&template[start + 1..pos]));
        }
        pos += 1;
        while pos < bytes.len() {
            if bytes[pos] == b':' && bytes.get(pos + 1).is_some_and(|b| is_ident_start(*b)) {
                break;
            }
            pos += 1;
        }
        Some(Token::Literal(&template[start..pos]))
    })
}

/// Byte offset where the path starts in `scheme://authority/...`, or 0.
///
/// Userinfo and ports live in the authority and never hold placeholders.
fn authority_end(template: &str) -> usize {
    let Some(scheme_end) = template.find("://") else {
        return 0;
    };
    let scheme = &template[..scheme_end];
    let is_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return 0;
    }
    let rest = scheme_end + 3;
    template[rest..]
        .find(['/', '?', '#'])
        .map_or(template.len(), |at| rest + at)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
