/*!
 * Wire contract tests for the HTTP backends.
 *
 * Each backend talks to a local mock server, so these tests check the
 * exact requests sent and how real responses are interpreted.
 */

use mockito::Matcher;
use serde_json::json;
use subtran::app_config::ApiTier;
use subtran::errors::ProviderError;
use subtran::providers::TranslationBackend;
use subtran::providers::deepl::DeepL;
use subtran::providers::libretranslate::LibreTranslate;

/// Test a LibreTranslate request body and object response
#[tokio::test]
async fn test_libretranslate_translate_withObjectResponse_shouldPostJsonAndReturnText() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "q": "Hello world",
            "source": "en",
            "target": "fr",
            "format": "text"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translatedText": "Bonjour le monde"}"#)
        .create_async()
        .await;

    let client = LibreTranslate::new(server.url(), "", 30);
    let text = client.translate("Hello world", "en", "fr").await.unwrap();

    assert_eq!(text, "Bonjour le monde");
    mock.assert_async().await;
}

/// Test that the API key is sent and an array response is accepted
#[tokio::test]
async fn test_libretranslate_translate_withApiKeyAndArrayResponse_shouldReturnFirstText() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .match_body(Matcher::PartialJson(json!({"api_key": "secret", "source": "auto"})))
        .with_status(200)
        .with_body(r#"[{"translatedText": "Hola"}]"#)
        .create_async()
        .await;

    let client = LibreTranslate::new(format!("{}/", server.url()), "secret", 30);
    let text = client.translate("Hello", "auto", "es").await.unwrap();

    assert_eq!(text, "Hola");
    mock.assert_async().await;
}

/// Test that a server error carries the status and body
#[tokio::test]
async fn test_libretranslate_translate_withServerError_shouldReturnApiError() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .with_status(500)
        .with_body("Internal error")
        .create_async()
        .await;

    let client = LibreTranslate::new(server.url(), "", 30);
    let error = client.translate("Hello", "en", "fr").await.unwrap_err();

    match &error {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(*status_code, 500);
            assert_eq!(message, "Internal error");
        }
        other => panic!("Unexpected error type: {:?}", other),
    }
    mock.assert_async().await;
}

/// Test that an unknown payload shape is rejected
#[tokio::test]
async fn test_libretranslate_translate_withUnexpectedBody_shouldReturnUnexpectedResponse() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(200)
        .with_body(r#"{"unexpected": "field"}"#)
        .create_async()
        .await;

    let client = LibreTranslate::new(server.url(), "", 30);
    let error = client.translate("Hello", "en", "fr").await.unwrap_err();

    assert!(matches!(error, ProviderError::UnexpectedResponse(_)));
    assert!(error.to_string().contains("unexpected"));
}

/// Test that an unreachable server is a request failure
#[tokio::test]
async fn test_libretranslate_translate_withUnreachableServer_shouldReturnRequestFailed() {
    let client = LibreTranslate::new("http://127.0.0.1:9", "", 5);
    let result = client.translate("Hello", "en", "fr").await;

    assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
}

/// Test the DeepL auth header and form body
#[tokio::test]
async fn test_deepl_translate_withFormRequest_shouldSendAuthKeyAndUppercaseTarget() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/translate")
        .match_header("authorization", "DeepL-Auth-Key test-key")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("text".into(), "Hello\nworld".into()),
            Matcher::UrlEncoded("target_lang".into(), "DE".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"translations": [{"detected_source_language": "EN", "text": "Hallo\nWelt"}]}"#)
        .create_async()
        .await;

    let client = DeepL::with_endpoint("test-key", format!("{}/v2/translate", server.url()), 30);
    let text = client.translate("Hello\nworld", "en", "de").await.unwrap();

    assert_eq!(text, "Hallo\nWelt");
    mock.assert_async().await;
}

/// Test a DeepL authorization failure
#[tokio::test]
async fn test_deepl_translate_withForbidden_shouldReturnApiError() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v2/translate")
        .with_status(403)
        .with_body(r#"{"message": "Wrong endpoint"}"#)
        .create_async()
        .await;

    let client = DeepL::with_endpoint("bad-key", format!("{}/v2/translate", server.url()), 30);
    let error = client.translate("Hello", "en", "fr").await.unwrap_err();

    match error {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 403);
            assert!(message.contains("Wrong endpoint"));
        }
        other => panic!("Unexpected error type: {:?}", other),
    }
}

/// Test that tier selection does not depend on the key format
#[test]
fn test_deepl_new_withFreeStyleKeyOnPaidTier_shouldUsePaidHost() {
    let client = DeepL::new("abc:fx", ApiTier::Paid, 30);
    assert_eq!(client.endpoint(), "https://api.deepl.com/v2/translate");
}

#[cfg(feature = "google")]
mod google {
    use super::*;
    use subtran::providers::google::GoogleTranslate;

    /// Test the Google query parameters and sentence concatenation
    #[tokio::test]
    async fn test_google_translate_withSentences_shouldSendQueryAndJoinResult() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client".into(), "gtx".into()),
                Matcher::UrlEncoded("sl".into(), "en".into()),
                Matcher::UrlEncoded("tl".into(), "it".into()),
                Matcher::UrlEncoded("dt".into(), "t".into()),
                Matcher::UrlEncoded("q".into(), "Hi there. Bye.".into()),
            ]))
            .with_status(200)
            .with_body(r#"[[["Ciao. ","Hi there. ",null,null,3],["Addio.","Bye.",null,null,3]],null,"en"]"#)
            .create_async()
            .await;

        let client = GoogleTranslate::new(server.url());
        let text = client.translate("Hi there. Bye.", "en", "it").await.unwrap();

        assert_eq!(text, "Ciao. Addio.");
        mock.assert_async().await;
    }

    /// Test rate limiting surfaces as an API error
    #[tokio::test]
    async fn test_google_translate_withTooManyRequests_shouldReturnApiError() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("Too Many Requests")
            .create_async()
            .await;

        let client = GoogleTranslate::new(server.url());
        let result = client.translate("Hello", "en", "fr").await;

        assert!(matches!(result, Err(ProviderError::ApiError { status_code: 429, .. })));
    }
}
