#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use social_connect::{
	callback::CallbackParams,
	config::ClientIds,
	flow::{Completion, Connector},
	link::{AccountLinker, LinkError, LinkRequest, ReqwestAccountLinker},
	platform::Platform,
	session::MemorySessionStore,
};

const LINK_PATH: &str = "/api/v1/social-suit/callback/oauth";

fn build_linker(server: &MockServer) -> ReqwestAccountLinker {
	let endpoint =
		Url::parse(&server.url(LINK_PATH)).expect("Mock link endpoint should parse successfully.");

	ReqwestAccountLinker::new(endpoint).with_bearer_token("user-token")
}

#[tokio::test]
async fn linker_posts_request_and_reads_envelope() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(LINK_PATH)
				.header("content-type", "application/json")
				.header("authorization", "Bearer user-token")
				.json_body(json!({
					"platform": "linkedin",
					"authorization_code": "code-1",
					"redirect_uri": "https://app.example.com/auth/callback",
				}));
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"message\":\"Connected.\",\"data\":{\"platform\":\"linkedin\",\"account_id\":\"li-42\",\"username\":\"acme\"}}",
			);
		})
		.await;
	let account = build_linker(&server)
		.link(LinkRequest {
			platform: Platform::LinkedIn,
			authorization_code: "code-1".into(),
			redirect_uri: "https://app.example.com/auth/callback".into(),
			code_verifier: None,
		})
		.await
		.expect("Linking should succeed against the mock service.");

	mock.assert_async().await;

	assert_eq!(account.platform, Some(Platform::LinkedIn));
	assert_eq!(account.account_id.as_deref(), Some("li-42"));
}

#[tokio::test]
async fn linker_surfaces_backend_error_messages() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LINK_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"success\":false,\"message\":\"Invalid authorization code.\"}");
		})
		.await;
	let err = build_linker(&server)
		.link(LinkRequest {
			platform: Platform::TikTok,
			authorization_code: "stale".into(),
			redirect_uri: "https://app.example.com/auth/callback".into(),
			code_verifier: None,
		})
		.await
		.expect_err("Backend rejections must surface as errors.");

	mock.assert_async().await;

	assert!(matches!(err, LinkError::Rejected { status: Some(400), .. }));
	assert_eq!(err.user_message(), "Invalid authorization code.");
}

#[tokio::test]
async fn connector_completes_twitter_flow_over_http() {
	let server = MockServer::start_async().await;
	let connector = Connector::new(
		Arc::new(MemorySessionStore::default()),
		ClientIds::default().with(Platform::Twitter, "tw-client"),
		Url::parse("https://app.example.com").expect("Origin fixture should parse."),
	)
	.expect("Connector should build for a valid origin.");
	let redirect =
		connector.initiate("twitter", Some("/dashboard")).await.expect("Flow should start.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(LINK_PATH)
				.body_includes("\"platform\":\"twitter\"")
				.body_includes("\"authorization_code\":\"tw-code\"")
				.body_includes("\"code_verifier\":");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"data\":{\"username\":\"acme\"}}");
		})
		.await;
	let params = CallbackParams::from_query(&format!("code=tw-code&state={}", redirect.state));
	let completion = connector
		.complete(&params, &build_linker(&server))
		.await
		.expect("Completion should run.");

	mock.assert_async().await;

	match completion {
		Completion::Connected { platform, navigate_to, account } => {
			assert_eq!(platform, Platform::Twitter);
			assert_eq!(navigate_to, "/dashboard");
			assert_eq!(account.username.as_deref(), Some("acme"));
		},
		other => panic!("Unexpected completion: {other:?}"),
	}
}
