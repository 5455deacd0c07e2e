// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use url::Url;
// self
use social_connect::{
	callback::CallbackParams,
	config::ClientIds,
	error::Error,
	flow::{
		CONNECTIONS_PATH, CallbackFailure, CallbackOutcome, Completion, Connector,
		MISSING_CODE_MESSAGE, STATE_MISMATCH_MESSAGE,
	},
	link::{AccountLinker, LinkError, LinkFuture, LinkRequest, LinkedAccount},
	platform::Platform,
	session::MemorySessionStore,
};

const ORIGIN: &str = "https://app.example.com";

fn build_connector() -> (Connector, MemorySessionStore) {
	let store = MemorySessionStore::default();
	let clients = Platform::ALL
		.into_iter()
		.fold(ClientIds::default(), |ids, platform| ids.with(platform, format!("{platform}-client")));
	let connector = Connector::new(
		Arc::new(store.clone()),
		clients,
		Url::parse(ORIGIN).expect("Origin fixture should parse."),
	)
	.expect("Connector should build for a valid origin.");

	(connector, store)
}

fn query(url: &Url) -> HashMap<String, String> {
	url.query_pairs().into_owned().collect()
}

#[derive(Default)]
struct RecordingLinker {
	requests: parking_lot::Mutex<Vec<LinkRequest>>,
	reject_with: Option<String>,
}
impl AccountLinker for RecordingLinker {
	fn link(&self, request: LinkRequest) -> LinkFuture<'_, LinkedAccount> {
		Box::pin(async move {
			let platform = request.platform;

			self.requests.lock().push(request);

			match &self.reject_with {
				Some(message) => Err(LinkError::Rejected { status: Some(400), message: message.clone() }),
				None => Ok(LinkedAccount {
					platform: Some(platform),
					account_id: Some("acct-1".into()),
					username: Some("acme".into()),
				}),
			}
		})
	}
}

#[tokio::test]
async fn twitter_flow_stores_session_and_builds_pkce_url() {
	let (connector, store) = build_connector();
	let redirect = connector
		.initiate("twitter", Some("/dashboard"))
		.await
		.expect("Twitter flow should start.");
	let session = store.peek().expect("Initiating a flow must store a session.");

	assert_eq!(session.platform, Platform::Twitter);
	assert_eq!(session.redirect_to.as_deref(), Some("/dashboard"));
	assert_eq!(session.state, redirect.state);
	assert!(session.state.len() >= 36);
	assert!(session.code_verifier.is_some());

	let pairs = query(&redirect.url);

	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&"twitter-client".into()));
	assert_eq!(pairs.get("redirect_uri"), Some(&format!("{ORIGIN}/auth/callback")));
	assert_eq!(pairs.get("state"), Some(&session.state));
	assert_eq!(pairs.get("code_challenge_method"), Some(&"S256".into()));
	assert_eq!(
		pairs.get("code_challenge"),
		session.code_verifier.as_ref().map(|verifier| verifier.challenge()).as_ref()
	);
}

#[tokio::test]
async fn aliases_resolve_to_canonical_platforms() {
	let (connector, store) = build_connector();
	let redirect = connector.initiate("facebook", None).await.expect("Alias should resolve.");

	assert_eq!(redirect.platform, Platform::Meta);
	assert!(redirect.url.as_str().starts_with("https://www.facebook.com/"));
	assert_eq!(store.peek().map(|session| session.platform), Some(Platform::Meta));

	let redirect = connector.initiate("x", None).await.expect("Alias should resolve.");

	assert_eq!(redirect.platform, Platform::Twitter);
}

#[tokio::test]
async fn unknown_platform_persists_nothing() {
	let (connector, store) = build_connector();
	let err = connector
		.initiate("myspace", Some("/dashboard"))
		.await
		.expect_err("Unknown platforms must be rejected.");

	assert!(matches!(err, Error::UnknownPlatform { ref platform } if platform == "myspace"));
	assert!(store.peek().is_none());
}

#[tokio::test]
async fn missing_client_id_is_reported_before_navigation() {
	let store = MemorySessionStore::default();
	let connector = Connector::new(
		Arc::new(store.clone()),
		ClientIds::default().with(Platform::YouTube, "   "),
		Url::parse(ORIGIN).expect("Origin fixture should parse."),
	)
	.expect("Connector should build for a valid origin.");

	assert!(matches!(
		connector.initiate("youtube", None).await,
		Err(Error::MissingClientConfig { platform: Platform::YouTube })
	));
	assert!(store.peek().is_none());
}

#[tokio::test]
async fn valid_callback_is_authorized_once() {
	let (connector, store) = build_connector();
	let redirect =
		connector.initiate("linkedin", Some("/settings")).await.expect("Flow should start.");
	let outcome = connector
		.handle_callback(Some("auth-code"), Some(&redirect.state))
		.await
		.expect("Callback validation should run.");
	let CallbackOutcome::Authorized(authorized) = outcome else {
		panic!("Matching state must authorize the callback.");
	};

	assert_eq!(authorized.platform, Platform::LinkedIn);
	assert_eq!(authorized.code, "auth-code");
	assert_eq!(authorized.navigate_to(), "/settings");
	assert_eq!(authorized.redirect_uri.as_str(), format!("{ORIGIN}/auth/callback"));
	assert!(authorized.code_verifier.is_none());
	assert!(store.peek().is_none(), "Validation must consume the session.");

	let replay = connector
		.handle_callback(Some("auth-code"), Some(&redirect.state))
		.await
		.expect("Callback validation should run.");

	assert_eq!(replay.failure(), Some(&CallbackFailure::StateMismatch));
}

#[tokio::test]
async fn mismatched_state_fails_and_clears_the_slot() {
	let (connector, store) = build_connector();

	connector.initiate("tiktok", None).await.expect("Flow should start.");

	let outcome = connector
		.handle_callback(Some("auth-code"), Some("forged-state"))
		.await
		.expect("Callback validation should run.");

	assert_eq!(outcome.failure(), Some(&CallbackFailure::StateMismatch));
	assert_eq!(outcome.failure().map(|failure| failure.to_string()), Some(STATE_MISMATCH_MESSAGE.into()));
	assert!(store.peek().is_none());
}

#[tokio::test]
async fn callback_without_state_or_session_is_rejected() {
	let (connector, _) = build_connector();
	let no_session = connector
		.handle_callback(Some("auth-code"), Some("anything"))
		.await
		.expect("Callback validation should run.");

	assert_eq!(no_session.failure(), Some(&CallbackFailure::StateMismatch));

	connector.initiate("instagram", None).await.expect("Flow should start.");

	let no_state = connector
		.handle_callback(Some("auth-code"), None)
		.await
		.expect("Callback validation should run.");

	assert!(!no_state.is_authorized());
}

#[tokio::test]
async fn missing_code_fails_after_valid_state() {
	let (connector, _) = build_connector();
	let redirect = connector.initiate("youtube", None).await.expect("Flow should start.");
	let outcome = connector
		.handle_callback(Some(""), Some(&redirect.state))
		.await
		.expect("Callback validation should run.");

	assert_eq!(outcome.failure(), Some(&CallbackFailure::MissingAuthorizationCode));
	assert_eq!(
		outcome.failure().map(|failure| failure.message().into_owned()),
		Some(MISSING_CODE_MESSAGE.into())
	);
}

#[tokio::test]
async fn provider_denial_is_translated_and_clears_the_slot() {
	let (connector, store) = build_connector();
	let redirect = connector.initiate("meta", None).await.expect("Flow should start.");
	let params = CallbackParams::from_query(&format!(
		"error=access_denied&error_description=User+denied&state={}",
		redirect.state
	));
	let outcome = connector.handle_redirect(&params).await.expect("Redirect handling should run.");
	let failure = outcome.failure().expect("Provider errors must fail the callback.");

	assert!(matches!(failure, CallbackFailure::Provider(_)));
	assert_eq!(
		failure.message(),
		"You denied access to your account. Please try again if you want to connect this platform."
	);
	assert!(store.peek().is_none());
}

#[tokio::test]
async fn complete_links_and_navigates() {
	let (connector, _) = build_connector();
	let linker = RecordingLinker::default();
	let redirect = connector.initiate("twitter", None).await.expect("Flow should start.");
	let params = CallbackParams::from_query(&format!("code=abc&state={}", redirect.state));
	let completion =
		connector.complete(&params, &linker).await.expect("Completion should run.");

	assert_eq!(
		completion,
		Completion::Connected {
			platform: Platform::Twitter,
			navigate_to: CONNECTIONS_PATH.into(),
			account: LinkedAccount {
				platform: Some(Platform::Twitter),
				account_id: Some("acct-1".into()),
				username: Some("acme".into()),
			},
		}
	);

	let requests = linker.requests.lock();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].authorization_code, "abc");
	assert_eq!(requests[0].redirect_uri, format!("{ORIGIN}/auth/callback"));
	assert!(requests[0].code_verifier.is_some(), "Twitter exchanges need the PKCE verifier.");
}

#[tokio::test]
async fn complete_surfaces_linker_and_state_failures() {
	let (connector, _) = build_connector();
	let linker = RecordingLinker {
		reject_with: Some("This account is already connected.".into()),
		..Default::default()
	};
	let redirect = connector.initiate("linkedin", Some("/dashboard")).await.expect("Flow should start.");
	let params = CallbackParams::from_query(&format!("code=abc&state={}", redirect.state));

	assert_eq!(
		connector.complete(&params, &linker).await.expect("Completion should run."),
		Completion::Failed { message: "This account is already connected.".into() }
	);

	let forged = CallbackParams::from_query("code=abc&state=forged");

	assert_eq!(
		connector.complete(&forged, &linker).await.expect("Completion should run."),
		Completion::Failed { message: STATE_MISMATCH_MESSAGE.into() }
	);
	assert_eq!(linker.requests.lock().len(), 1, "Rejected callbacks must not reach the linker.");
}

#[tokio::test]
async fn new_flow_supersedes_and_abandon_clears() {
	let (connector, store) = build_connector();
	let first = connector.initiate("meta", None).await.expect("Flow should start.");
	let second = connector.initiate("instagram", None).await.expect("Flow should start.");

	assert_ne!(first.state, second.state);
	assert_eq!(store.peek().map(|session| session.platform), Some(Platform::Instagram));

	connector.abandon().await.expect("Abandon should succeed.");
	connector.abandon().await.expect("Abandon should be idempotent.");

	assert!(store.peek().is_none());
}
