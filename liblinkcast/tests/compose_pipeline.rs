//! Integration tests for the drafting pipeline
//!
//! Runs the composer against mock providers and checks the draft that
//! comes out, then drives a composed draft through a scripted publish —
//! the full draft-then-publish flow the CLI tools offer.

use std::sync::Arc;

use serde_json::json;

use liblinkcast::composer::{discard_image, DraftComposer};
use liblinkcast::linkedin::mock::MockTransport;
use liblinkcast::linkedin::LinkedInClient;
use liblinkcast::providers::mock::{MockImageGenerator, MockSearch, MockTextGenerator};
use liblinkcast::{Credentials, ImageAsset};

fn composer() -> DraftComposer {
    DraftComposer::new(
        Box::new(MockSearch::returning(
            "Title: Rust hits the mainstream\nSummary: Adoption keeps growing\nLink: https://a.test\n\n",
        )),
        Box::new(MockTextGenerator::returning(
            "Rust adoption keeps climbing.\r\n\r\n\r\n\r\nTeams report fewer memory bugs.  \n  What has your experience been?",
        )),
        Box::new(MockImageGenerator::succeeding()),
    )
}

#[tokio::test]
async fn compose_produces_a_publishable_draft() {
    let composer = composer();
    let draft = composer.compose("rust adoption").await.unwrap();

    assert_eq!(draft.topic, "rust adoption");
    assert!(draft.context.contains("Rust hits the mainstream"));
    // Line endings canonicalized, blank runs collapsed, lines trimmed
    assert_eq!(
        draft.content,
        "Rust adoption keeps climbing.\n\nTeams report fewer memory bugs.\nWhat has your experience been?"
    );
    assert!(draft.image_path.exists());

    discard_image(&draft.image_path);
}

#[tokio::test]
async fn composed_draft_publishes_end_to_end() {
    let composer = composer();
    let draft = composer.compose("rust adoption").await.unwrap();

    let mock = Arc::new(MockTransport::with_script(vec![
        MockTransport::json_response(
            200,
            json!({
                "value": {
                    "uploadUrl": "https://upload.linkedin.test/media/1",
                    "image": "urn:li:image:1",
                }
            }),
        ),
        MockTransport::text_response(201, ""),
        MockTransport::response_with_headers(201, &[("x-linkedin-id", "urn:li:share:55")], ""),
    ]));
    let credentials = Credentials::new("test-token", "urn:li:person:abc", "202504").unwrap();
    let client = LinkedInClient::with_transport(credentials, "https://api.linkedin.test", mock);

    // The staged image is a real file, so probing works as in production
    let asset = ImageAsset::probe(&draft.image_path).unwrap();
    let receipt = client.publish(&draft.content, &asset).await.unwrap();

    assert_eq!(receipt.post_id.as_deref(), Some("urn:li:share:55"));
    assert_eq!(receipt.caption, draft.content);

    // Publication never touches the staged file; discarding is ours
    assert!(draft.image_path.exists());
    assert!(discard_image(&draft.image_path));
    assert!(!draft.image_path.exists());
}

#[tokio::test]
async fn draft_serializes_for_json_output() {
    let composer = composer();
    let draft = composer.compose("rust adoption").await.unwrap();

    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["topic"], "rust adoption");
    assert!(json["content"].as_str().unwrap().contains("Rust adoption"));
    assert!(json["image_path"].as_str().is_some());

    discard_image(&draft.image_path);
}
