//! Integration tests for the HTTP client and request builder.

use std::time::Duration;

use petrel::{HttpClient, HttpClientBuilder, HttpMethod, RequestBody};

#[tokio::test]
async fn test_client_creation() {
    let client = HttpClient::new();
    assert!(client.config().timeout.is_some());
    assert!(client.config().follow_redirects);
}

#[tokio::test]
async fn test_client_builder() {
    let client = HttpClientBuilder::new()
        .timeout(Duration::from_secs(60))
        .no_redirects()
        .max_redirects(5)
        .build()
        .expect("Failed to build client");

    assert_eq!(client.config().timeout, Some(Duration::from_secs(60)));
    assert!(!client.config().follow_redirects);
    assert_eq!(client.config().max_redirects, 5);
}

#[tokio::test]
async fn test_request_builder_methods() {
    let client = HttpClient::new();

    // Test that all HTTP methods create valid request builders
    let _ = client.get("https://example.com");
    let _ = client.post("https://example.com");
    let _ = client.put("https://example.com");
    let _ = client.delete("https://example.com");
    let _ = client.patch("https://example.com");
    let _ = client.head("https://example.com");
    let _ = client.request(HttpMethod::Connect, "https://example.com");
    let _ = client.request(HttpMethod::Options, "https://example.com");
    let _ = client.request(HttpMethod::Trace, "https://example.com");
}

#[tokio::test]
async fn test_every_method_round_trips() {
    let client = HttpClient::new();
    let methods = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Connect,
        HttpMethod::Options,
        HttpMethod::Trace,
        HttpMethod::Patch,
    ];

    for method in methods {
        let request = client.request(method, "https://example.com").build();
        assert_eq!(request.method, method);
    }
}

#[tokio::test]
async fn test_request_builder_chain() {
    let client = HttpClient::new();

    // Test builder chaining
    let request = client
        .post("https://example.com/api")
        .header("Content-Type", "application/json")
        .header("Authorization", "Bearer token123")
        .query("page", "1")
        .query("limit", "10")
        .timeout(Duration::from_secs(5))
        .build();

    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://example.com/api");
    assert_eq!(request.headers.len(), 2);
    assert_eq!(request.query.len(), 2);
    assert_eq!(request.timeout, Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_path_chaining() {
    let client = HttpClient::new();

    let request = client
        .get("https://example.com")
        .path("v1")
        .path("users//42/")
        .build();

    assert_eq!(request.url, "https://example.com/v1/users/42");
}

#[tokio::test]
async fn test_json_body() {
    let client = HttpClient::new();

    let request = client
        .post("https://example.com/api")
        .json(&serde_json::json!({
            "name": "test",
            "value": 42
        }))
        .build();

    assert!(matches!(request.body, RequestBody::Json(_)));
}

#[tokio::test]
async fn test_form_body() {
    use std::collections::HashMap;

    let client = HttpClient::new();
    let mut form_data = HashMap::new();
    form_data.insert("username".to_string(), "testuser".to_string());
    form_data.insert("password".to_string(), "secret".to_string());

    let request = client.post("https://example.com/login").form(form_data).build();

    assert!(matches!(request.body, RequestBody::Form(_)));
}

#[tokio::test]
async fn test_raw_body() {
    let client = HttpClient::new();

    let request = client
        .post("https://example.com/upload")
        .body(vec![0u8, 1, 2, 255])
        .build();

    match request.body {
        RequestBody::Bytes(bytes) => assert_eq!(&bytes[..], &[0u8, 1, 2, 255]),
        other => panic!("expected bytes body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_basic_auth() {
    let client = HttpClient::new();

    let request = client
        .get("https://example.com/api")
        .basic_auth("user", Some("pass"))
        .build();

    assert!(request.auth.is_some());
}

#[tokio::test]
async fn test_bearer_auth() {
    let client = HttpClient::new();

    let request = client
        .get("https://example.com/api")
        .bearer_auth("my-token-123")
        .build();

    assert!(request.auth.is_some());
}

// Note: We use wiremock for mocked HTTP tests
#[cfg(feature = "integration-tests")]
mod integration_tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Hello, World!"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let response = client
            .get(&format!("{}/test", mock_server.uri()))
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 200);
        assert!(response.is_success());

        let body = response.text().await.expect("Failed to read body");
        assert_eq!(body, "Hello, World!");
    }

    #[tokio::test]
    async fn test_post_json_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/users"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"id": 1, "name": "John"})),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let response = client
            .post(&format!("{}/api/users", mock_server.uri()))
            .json(&serde_json::json!({"name": "John"}))
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 201);

        let data: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(data["id"], 1);
        assert_eq!(data["name"], "John");
    }

    #[tokio::test]
    async fn test_path_segments_reach_the_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/42"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let response = client
            .get(mock_server.uri())
            .path("/v1//users/")
            .path("42")
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_query_parameters_reach_the_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "petrel"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let response = client
            .get(&format!("{}/search", mock_server.uri()))
            .query("q", "petrel")
            .query("page", "2")
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_duplicate_headers_are_sent_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/echo"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        client
            .get(&format!("{}/echo", mock_server.uri()))
            .header("x-tag", "first")
            .header("x-tag", "second")
            .send()
            .await
            .expect("Request failed");

        let requests = mock_server
            .received_requests()
            .await
            .expect("Request recording disabled");
        let values: Vec<_> = requests[0]
            .headers
            .get_all("x-tag")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, ["first", "second"]);
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build client");

        let result = client.get(&format!("{}/slow", mock_server.uri())).send().await;

        assert!(matches!(result, Err(petrel::HttpError::Timeout)));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/not-found"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let response = client
            .get(&format!("{}/not-found", mock_server.uri()))
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 404);
        assert!(response.is_client_error());
        assert!(!response.is_success());
    }
}
