//! Integration tests for `MyMemoryTranslator` against a wiremock server.

use cropsage_core::Language;
use cropsage_workflow::{translate_or_original, MyMemoryTranslator, TranslateError, Translator};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn translator(server: &MockServer) -> MyMemoryTranslator {
    MyMemoryTranslator::new(&format!("{}/get", server.uri()), 5, "cropsage-test/0.1")
        .expect("translator construction should not fail")
}

#[tokio::test]
async fn translates_with_langpair_and_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("q", "पत्ते पीले हैं"))
        .and(query_param("langpair", "hi|en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "leaves are yellow ", "match": 0.98 },
            "responseStatus": 200,
            "responseDetails": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translated = translator(&server)
        .translate("पत्ते पीले हैं", Language::Hindi, Language::English)
        .await
        .expect("translation should succeed");

    assert_eq!(translated, "leaves are yellow");
}

#[tokio::test]
async fn same_language_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let translated = translator(&server)
        .translate("wilting", Language::English, Language::English)
        .await
        .unwrap();

    assert_eq!(translated, "wilting");
}

#[tokio::test]
async fn in_band_error_status_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS" },
            "responseStatus": 429,
            "responseDetails": "quota exceeded"
        })))
        .mount(&server)
        .await;

    let result = translator(&server)
        .translate("wilting", Language::English, Language::Marathi)
        .await;

    assert!(
        matches!(
            result,
            Err(TranslateError::Service { status: 429, ref message }) if message == "quota exceeded"
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn string_error_status_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "'EN' IS AN INVALID TARGET LANGUAGE" },
            "responseStatus": "403",
            "responseDetails": "invalid language pair"
        })))
        .mount(&server)
        .await;

    let result = translator(&server)
        .translate("wilting", Language::English, Language::Hindi)
        .await;

    assert!(
        matches!(result, Err(TranslateError::Service { status: 403, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn empty_translation_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "  " },
            "responseStatus": 200
        })))
        .mount(&server)
        .await;

    let result = translator(&server)
        .translate("wilting", Language::English, Language::Hindi)
        .await;

    assert!(matches!(result, Err(TranslateError::Empty)), "got: {result:?}");
}

#[tokio::test]
async fn http_failure_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = translator(&server)
        .translate("wilting", Language::English, Language::Hindi)
        .await;

    assert!(
        matches!(result, Err(TranslateError::UnexpectedStatus { status: 503 })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn degraded_translation_returns_source_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let text = translate_or_original(
        &translator(&server),
        "Nitrogen Deficiency",
        Language::English,
        Language::Hindi,
    )
    .await;

    assert_eq!(text, "Nitrogen Deficiency");
}
