use httpmock::prelude::*;
use image::{DynamicImage, Rgb, RgbImage};
use rtablex::extract::source::encode_png;
use rtablex::{
    ChatCompletionRequest, ExtractorError, MistralClient, MistralConfig, PdfConfig, SourceKind,
    TableExtractor, UploadedFile, UserMessage, VisionModel,
};
use serde_json::json;
use std::sync::Arc;

fn client_for(server: &MockServer) -> MistralClient {
    let config = MistralConfig::new()
        .with_api_key("test-key")
        .with_base_url(server.url("/v1"))
        .with_timeout_secs(5);
    MistralClient::new(&config).unwrap()
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion",
        "model": "mistral-large-latest",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 812, "completion_tokens": 40, "total_tokens": 852}
    })
}

fn png_upload(name: &str) -> UploadedFile {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([255, 255, 255])));
    UploadedFile::new(name, encode_png(&image).unwrap())
}

#[tokio::test]
async fn test_describe_image_sends_multimodal_message() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("\"model\":\"mistral-large-latest\"")
                .body_contains("\"type\":\"text\",\"text\":\"read the table\"")
                .body_contains("\"type\":\"image_url\",\"image_url\":\"data:image/png;base64,AAAA\"");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(completion("  [{\"Item\": \"Shirt\"}]  "));
        })
        .await;

    let client = client_for(&server);
    let answer = client
        .describe_image("read the table", "data:image/png;base64,AAAA")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(answer, "[{\"Item\": \"Shirt\"}]");
}

#[tokio::test]
async fn test_chat_client_completion() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("\"model\":\"pixtral-12b-2409\"")
                .body_contains("\"max_tokens\":256");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(completion("[]"));
        })
        .await;

    let config = MistralConfig::new()
        .with_api_key("test-key")
        .with_base_url(format!("{}/", server.url("/v1")))
        .with_model("pixtral-12b-2409");
    let client = MistralClient::new(&config).unwrap();
    assert_eq!(client.model(), "pixtral-12b-2409");
    assert_eq!(client.model_id(), "pixtral-12b-2409");
    assert_eq!(client.chat().endpoint(), server.url("/v1/chat/completions"));

    let request = ChatCompletionRequest {
        model: client.model().to_string(),
        messages: vec![UserMessage::with_image("read", "data:image/png;base64,AAAA")],
        temperature: None,
        max_tokens: Some(256),
    };
    let response = client.chat().complete(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.first_text(), "[]");
    assert_eq!(response.usage.unwrap().total_tokens, 852);
}

#[tokio::test]
async fn test_upstream_error_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({"message": "Unauthorized", "request_id": "abc"}));
        })
        .await;

    let err = client_for(&server)
        .describe_image("prompt", "data:image/png;base64,AAAA")
        .await
        .unwrap_err();

    match err {
        ExtractorError::ApiError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_completion_is_response_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>gateway</html>");
        })
        .await;

    let err = client_for(&server)
        .describe_image("prompt", "data:image/png;base64,AAAA")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractorError::ResponseError(_)));
}

#[tokio::test]
async fn test_images_end_to_end() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("Qty, Price");
            then.status(200).json_body(completion(
                "```json\n[{\"Item\": \"Shirt\", \"Qty\": 1, \"Price\": 12.5}]\n```",
            ));
        })
        .await;

    let extractor = TableExtractor::new(Arc::new(client_for(&server)), PdfConfig::default(), 8);
    let outcome = extractor
        .extract(
            SourceKind::Images,
            vec![png_upload("page1.png"), png_upload("page2.jpg")],
            "Item,Qty,Price",
        )
        .await
        .unwrap();

    mock.assert_hits_async(2).await;
    assert_eq!(outcome.pages, 2);
    assert_eq!(outcome.table.columns, vec!["Item", "Qty", "Price"]);
    assert_eq!(
        outcome.markdown,
        "| Item | Qty | Price |\n| --- | --- | --- |\n| Shirt | 1 | 12.5 |\n| Shirt | 1 | 12.5 |\n"
    );
}

#[tokio::test]
async fn test_no_rows_gives_warning() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .json_body(completion("I could not find any table in this image."));
        })
        .await;

    let extractor = TableExtractor::new(Arc::new(client_for(&server)), PdfConfig::default(), 8);
    let outcome = extractor
        .extract(SourceKind::Images, vec![png_upload("blank.png")], "Item")
        .await
        .unwrap();

    assert!(outcome.table.is_empty());
    assert_eq!(
        outcome.message.as_deref(),
        Some("No data extracted from uploaded files.")
    );
}
