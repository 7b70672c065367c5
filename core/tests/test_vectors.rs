//! Verify resolve/parse against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes inputs, the expected resolved request or a
//! simulated response, and the expected normalized outcome. Bodies are
//! compared as parsed JSON, not raw strings, so key order never matters.

use request_core::{
    BuildError, Defaults, Dispatcher, Error, HttpMethod, HttpResponse, Parameters, Resolver,
    ResponseData,
};
use serde_json::Value;

fn parse_method(value: &Value) -> HttpMethod {
    serde_json::from_value(value.clone()).unwrap_or_else(|_| panic!("unknown method: {value}"))
}

fn decode_hex(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_test_vectors() {
    let raw = include_str!("../../test-vectors/resolve.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let resolver = Resolver::new(Defaults::new().with_base_url(vectors["base_url"].as_str().unwrap()));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = Parameters::from_value(case["params"].clone()).unwrap();
        let expected = &case["expected_request"];

        let req = resolver.resolve_route(case["route"].as_str().unwrap(), params.clone()).unwrap();
        assert_eq!(req.method, parse_method(&expected["method"]), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");

        for (header, value) in expected["headers"].as_object().unwrap() {
            assert_eq!(req.header(header), value.as_str(), "{name}: header {header}");
        }
        for header in expected["absent_headers"].as_array().unwrap() {
            let header = header.as_str().unwrap();
            assert!(req.header(header).is_none(), "{name}: unexpected header {header}");
        }
        assert!(
            req.headers.iter().all(|(k, _)| *k == k.to_ascii_lowercase()),
            "{name}: header names must be lower case"
        );

        match &expected["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            body => {
                let sent = req.body.as_deref().unwrap();
                let parsed: Value = serde_json::from_slice(sent).unwrap();
                assert_eq!(&parsed, body, "{name}: body");
                assert_eq!(
                    req.header("content-length"),
                    Some(sent.len().to_string().as_str()),
                    "{name}: content-length"
                );
            }
        }

        let again = resolver.resolve_route(case["route"].as_str().unwrap(), params).unwrap();
        assert_eq!(req, again, "{name}: resolving twice");
    }
}

#[test]
fn resolve_error_vectors() {
    let raw = include_str!("../../test-vectors/resolve.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let resolver = Resolver::default();

    for case in vectors["error_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = Parameters::from_value(case["params"].clone()).unwrap();
        let err = resolver
            .resolve_route(case["route"].as_str().unwrap(), params)
            .unwrap_err();
        match case["expected_error"].as_str().unwrap() {
            "MissingParameter" => {
                assert!(matches!(err, BuildError::MissingParameter(_)), "{name}: {err}")
            }
            "InvalidParameterType" => {
                assert!(matches!(err, BuildError::InvalidParameterType { .. }), "{name}: {err}")
            }
            "UnknownMethod" => assert!(matches!(err, BuildError::UnknownMethod(_)), "{name}: {err}"),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn dispatch_test_vectors() {
    let raw = include_str!("../../test-vectors/dispatch.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let request_url = vectors["request_url"].as_str().unwrap();
    let dispatcher = Dispatcher::new();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(&case["method"]);

        let sim = &case["simulated_response"];
        let mut response = HttpResponse::new(sim["status"].as_u64().unwrap() as u16);
        for (header, value) in sim["headers"].as_object().unwrap() {
            response = response.with_header(header, value.as_str().unwrap());
        }
        response.body = match sim.get("body_hex") {
            Some(hex) => decode_hex(hex.as_str().unwrap()),
            None => sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };

        let result = dispatcher.parse(method, request_url, response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = match result {
                Err(Error::Request(err)) => err,
                other => panic!("{name}: expected request error, got {other:?}"),
            };
            assert_eq!(u64::from(err.code()), expected_error["code"].as_u64().unwrap(), "{name}: code");
            assert_eq!(err.message(), expected_error["message"].as_str().unwrap(), "{name}: message");
            continue;
        }

        let response = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected_result"];
        assert_eq!(u64::from(response.status), expected["status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(response.url, request_url, "{name}: url");
        match expected["kind"].as_str().unwrap() {
            "empty" => assert!(response.data.is_empty(), "{name}: data should be empty"),
            "json" => assert_eq!(response.data, ResponseData::Json(expected["data"].clone()), "{name}: data"),
            "text" => assert_eq!(
                response.data.as_text(),
                expected["data"].as_str(),
                "{name}: data"
            ),
            "binary" => assert_eq!(
                response.data.as_bytes(),
                Some(&decode_hex(expected["data_hex"].as_str().unwrap())[..]),
                "{name}: data"
            ),
            other => panic!("{name}: unknown kind: {other}"),
        }
    }
}
