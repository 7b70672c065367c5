//! Endpoint resolution: template + parameter bag → `HttpRequest`.
//!
//! # Design
//! `Resolver` holds only its `Defaults` and carries no mutable state between
//! calls, so resolving the same inputs twice yields identical requests.
//! Parameters are routed in three steps: placeholders consume their values
//! from the bag, reserved keys are pulled out, and whatever remains goes to
//! the query string (GET/HEAD) or a JSON body (everything else).

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::config::Defaults;
use crate::endpoint::{is_absolute_url, template_tokens, Endpoint, Token};
use crate::error::BuildError;
use crate::http::{set_header, HttpMethod, HttpRequest};
use crate::params::{kind_of, Parameters, RESERVED_KEYS};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Stateless request builder bound to a set of defaults.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    defaults: Defaults,
}

impl Resolver {
    pub fn new(defaults: Defaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Resolve the `"METHOD /path/:param"` shorthand.
    pub fn resolve_route(&self, route: &str, params: Parameters) -> Result<HttpRequest, BuildError> {
        let endpoint = Endpoint::parse(route)?;
        self.resolve(&endpoint, params)
    }

    /// Resolve a bag that carries its own `method` and `url` entries.
    pub fn resolve_options(&self, mut params: Parameters) -> Result<HttpRequest, BuildError> {
        let method = match params.remove("method") {
            None | Some(Value::Null) => HttpMethod::Get,
            Some(Value::String(method)) => method.parse()?,
            Some(other) => return Err(reserved_type_error("method", &other)),
        };
        let url = match params.remove("url") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(url)) => url,
            Some(other) => return Err(reserved_type_error("url", &other)),
        };
        self.resolve(&Endpoint::new(method, url), params)
    }

    pub fn resolve(&self, endpoint: &Endpoint, params: Parameters) -> Result<HttpRequest, BuildError> {
        let method = endpoint.method();
        let (mut values, caller_headers) = params.into_parts();

        let mut path = String::with_capacity(endpoint.url().len());
        for token in template_tokens(endpoint.url()) {
            match token {
                Token::Literal(literal) => path.push_str(literal),
                Token::Placeholder(name) => {
                    let value = path_value(name, values.get(name))?;
                    path.push_str(&escape_path_segment(&value));
                }
            }
        }
        for name in endpoint.placeholders() {
            values.shift_remove(name);
        }

        let base_url = match values.shift_remove("baseUrl") {
            None | Some(Value::Null) => self.defaults.base_url().to_string(),
            Some(Value::String(base_url)) => base_url.trim_end_matches('/').to_string(),
            Some(other) => return Err(reserved_type_error("baseUrl", &other)),
        };
        let data = values.shift_remove("data");
        values.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

        let mut url = join_url(&base_url, &path);
        let body = if method.allows_body() {
            match data {
                Some(Value::String(raw)) => Some(raw.into_bytes()),
                Some(Value::Null) | None if values.is_empty() => None,
                Some(Value::Null) | None => Some(serde_json::to_vec(&Value::Object(values))?),
                Some(other) => Some(serde_json::to_vec(&other)?),
            }
        } else {
            append_query(&mut url, &values);
            None
        };

        url::Url::parse(&url).map_err(|source| BuildError::InvalidUrl {
            url: url.clone(),
            source,
        })?;

        let mut headers = self.defaults.headers().to_vec();
        for (name, value) in caller_headers {
            set_header(&mut headers, &name, value);
        }
        if let Some(body) = &body {
            if !headers.iter().any(|(k, _)| k == "content-type") {
                set_header(&mut headers, "content-type", JSON_CONTENT_TYPE.to_string());
            }
            set_header(&mut headers, "content-length", body.len().to_string());
        }

        tracing::debug!(
            %method,
            url = %url,
            body_len = body.as_ref().map(Vec::len),
            "resolved request"
        );

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

fn reserved_type_error(key: &str, value: &Value) -> BuildError {
    BuildError::InvalidParameters(format!("{key} must be a string, got {}", kind_of(value)))
}

/// String form of a placeholder value. Only scalars may fill a path segment.
fn path_value(name: &str, value: Option<&Value>) -> Result<String, BuildError> {
    match value {
        None | Some(Value::Null) => Err(BuildError::MissingParameter(name.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(BuildError::InvalidParameterType {
            name: name.to_string(),
            kind: kind_of(other),
        }),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn escape_path_segment(segment: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(segment.len());
    for &b in segment.as_bytes() {
        if matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn join_url(base_url: &str, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }
    if path.is_empty() || path.starts_with(['/', '?']) {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

/// Append extra parameters to `url`'s query string in bag order, skipping
/// keys the template already spells out. A `#fragment` stays last.
fn append_query(url: &mut String, values: &Map<String, Value>) {
    let fragment = url.find('#').map(|at| url.split_off(at));
    let literal_keys: Vec<String> = match url.split_once('?') {
        Some((_, query)) => {
            form_urlencoded::parse(query.as_bytes())
                .map(|(key, _)| key.into_owned())
                .collect()
        }
        None => Vec::new(),
    };

    let mut pairs = Vec::new();
    for (key, value) in values {
        if literal_keys.iter().any(|k| k == key) {
            continue;
        }
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push(encode_pair(key, &query_value(item)));
                }
            }
            other => pairs.push(encode_pair(key, &query_value(other))),
        }
    }
    if !pairs.is_empty() {
        if !url.contains('?') {
            url.push('?');
        } else if !url.ends_with('?') && !url.ends_with('&') {
            url.push('&');
        }
        url.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        url.push_str(&fragment);
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
    let value: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{key}={value}")
}
