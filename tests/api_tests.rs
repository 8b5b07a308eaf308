// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tradeclip::api::{ApiClient, ApiError};

// Pointing the client at a closed local port makes any actual network use
// fail loudly, so short-query tests prove no request was attempted.
fn unreachable_client() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9").unwrap()
}

#[test]
fn short_queries_skip_the_network_entirely() {
    let api = unreachable_client();
    assert_eq!(api.search_stocks("").unwrap(), vec![]);
    assert_eq!(api.search_stocks("r").unwrap(), vec![]);
    assert_eq!(api.search_stocks("  r  ").unwrap(), vec![]);
}

#[test]
fn transport_failures_surface_as_network_errors() {
    let api = unreachable_client();
    match api.search_stocks("re") {
        Err(ApiError::Network(_)) => {}
        other => panic!("expected network error, got {:?}", other.map(|v| v.len())),
    }
    match api.list_portfolios() {
        Err(ApiError::Network(_)) => {}
        other => panic!("expected network error, got {:?}", other.map(|v| v.len())),
    }
}
