use super::*;

#[test]
fn test_provider_error_api_error() {
    let err = ProviderError::ApiError {
        status: 500,
        message: "Internal Server Error".to_string(),
    };
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("Internal Server Error"));
}

#[test]
fn test_from_api_response_auth() {
    let err = ProviderError::from_api_response(403, "API key not valid");
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    let err = ProviderError::from_api_response(401, "missing key");
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
}

#[test]
fn test_from_api_response_rate_limited() {
    let err = ProviderError::from_api_response(429, "quota");
    assert!(matches!(err, ProviderError::RateLimited(_)));
}

#[test]
fn test_from_api_response_invalid_request() {
    let err = ProviderError::from_api_response(400, "bad schema");
    assert!(matches!(err, ProviderError::InvalidRequest(ref m) if m == "bad schema"));
}

#[test]
fn test_from_api_response_other() {
    let err = ProviderError::from_api_response(503, "overloaded");
    match err {
        ProviderError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("unexpected variant: {:?}", other),
    }
}

#[test]
fn test_provider_error_network() {
    let err = ProviderError::Network("Connection refused".to_string());
    assert!(err.to_string().contains("Network error"));
}
