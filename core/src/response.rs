//! Normalized responses and body decoding.
//!
//! # Design
//! Content families are an ordered table of `(predicate, Decoder)` pairs.
//! The first predicate that accepts the content type picks the decoder;
//! anything unmatched is returned as raw bytes. Adding a family is one more
//! table row.

use serde_json::Value;

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// No body: HEAD, 204/205/304, or a zero-length payload.
    Empty,
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl ResponseData {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseData::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseData::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// A successful, normalized response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub data: ResponseData,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::http::find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoder {
    Json,
    Text,
    Binary,
}

type Predicate = fn(&str) -> bool;

const CONTENT_FAMILIES: &[(Predicate, Decoder)] = &[
    (is_json, Decoder::Json),
    (is_text, Decoder::Text),
];

/// Pick the decoder for a `content-type` header value (`None` if absent).
pub(crate) fn decoder_for(content_type: Option<&str>) -> Decoder {
    let content_type = content_type.map(str::trim).unwrap_or("").to_ascii_lowercase();
    CONTENT_FAMILIES
        .iter()
        .find(|(accepts, _)| accepts(content_type.as_str()))
        .map(|(_, decoder)| *decoder)
        .unwrap_or(Decoder::Binary)
}

fn essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

fn is_json(content_type: &str) -> bool {
    let essence = essence(content_type);
    essence == "application/json" || essence.ends_with("+json")
}

fn is_text(content_type: &str) -> bool {
    let essence = essence(content_type);
    if essence.is_empty() || essence.starts_with("text/") {
        return true;
    }
    if essence.starts_with("application/vnd.")
        && [".raw", ".diff", ".patch", ".html", ".text"]
            .iter()
            .any(|suffix| essence.ends_with(suffix))
    {
        return true;
    }
    content_type
        .split(';')
        .skip(1)
        .any(|param| param.replace([' ', '"'], "") == "charset=utf-8")
}

/// Decode a body of a successful response.
pub(crate) fn decode(body: Vec<u8>, content_type: Option<&str>) -> Result<ResponseData, serde_json::Error> {
    if body.is_empty() {
        return Ok(ResponseData::Empty);
    }
    match decoder_for(content_type) {
        Decoder::Json => serde_json::from_slice(&body).map(ResponseData::Json),
        Decoder::Text => Ok(decode_text(body)),
        Decoder::Binary => Ok(ResponseData::Binary(body)),
    }
}

/// Decode a body of an error response: malformed JSON degrades to text.
pub(crate) fn decode_lenient(body: Vec<u8>, content_type: Option<&str>) -> ResponseData {
    if body.is_empty() {
        return ResponseData::Empty;
    }
    match decoder_for(content_type) {
        Decoder::Json => match serde_json::from_slice(&body) {
            Ok(value) => ResponseData::Json(value),
            Err(_) => ResponseData::Text(String::from_utf8_lossy(&body).into_owned()),
        },
        Decoder::Text => decode_text(body),
        Decoder::Binary => ResponseData::Binary(body),
    }
}

fn decode_text(body: Vec<u8>) -> ResponseData {
    match String::from_utf8(body) {
        Ok(text) => ResponseData::Text(text),
        Err(e) => ResponseData::Binary(e.into_bytes()),
    }
}
