//! reqwest-backed [`AccountLinker`] that posts to the platform's connect endpoint.

// crates.io
use reqwest::header::{ACCEPT, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	link::{AccountLinker, LinkError, LinkFuture, LinkRequest, LinkedAccount},
};

/// Posts [`LinkRequest`] payloads as JSON and reads the `{success, data, message}` envelope.
#[derive(Clone)]
pub struct ReqwestAccountLinker {
	client: ReqwestClient,
	endpoint: Url,
	bearer_token: Option<String>,
}
impl ReqwestAccountLinker {
	/// Creates a linker with a default reqwest client.
	pub fn new(endpoint: Url) -> Self {
		Self::with_client(ReqwestClient::new(), endpoint)
	}

	/// Creates a linker that reuses the caller's reqwest client.
	pub fn with_client(client: ReqwestClient, endpoint: Url) -> Self {
		Self { client, endpoint, bearer_token: None }
	}

	/// Authenticates requests with the signed-in user's bearer token.
	pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
		self.bearer_token = Some(token.into());

		self
	}

	/// Endpoint receiving link requests.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}
}
impl Debug for ReqwestAccountLinker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestAccountLinker")
			.field("endpoint", &self.endpoint.as_str())
			.field("bearer_token_set", &self.bearer_token.is_some())
			.finish()
	}
}
impl AccountLinker for ReqwestAccountLinker {
	fn link(&self, request: LinkRequest) -> LinkFuture<'_, LinkedAccount> {
		Box::pin(async move {
			let body = serde_json::to_vec(&request).map_err(|source| LinkError::Encode { source })?;
			let mut builder = self
				.client
				.post(self.endpoint.clone())
				.header(CONTENT_TYPE, "application/json")
				.header(ACCEPT, "application/json")
				.body(body);

			if let Some(token) = self.bearer_token.as_deref() {
				builder = builder.bearer_auth(token);
			}

			let response = builder.send().await.map_err(LinkError::transport)?;
			let status = response.status();
			let bytes = response.bytes().await.map_err(LinkError::transport)?;

			interpret_response(status.as_u16(), status.is_success(), &bytes)
		})
	}
}

#[derive(Debug, Deserialize)]
struct Envelope {
	#[serde(default = "default_success")]
	success: bool,
	#[serde(default)]
	data: Option<LinkedAccount>,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	detail: Option<String>,
}
impl Envelope {
	fn into_message(self) -> Option<String> {
		self.message.or(self.detail).filter(|message| !message.trim().is_empty())
	}
}

fn default_success() -> bool {
	true
}

fn interpret_response(status: u16, ok: bool, body: &[u8]) -> Result<LinkedAccount, LinkError> {
	let parsed = parse_envelope(body);

	if !ok {
		let message = parsed
			.ok()
			.and_then(Envelope::into_message)
			.unwrap_or_else(|| format!("Account linking failed with HTTP status {status}."));

		return Err(LinkError::Rejected { status: Some(status), message });
	}

	let envelope = parsed.map_err(|source| LinkError::Response { source, status: Some(status) })?;

	if envelope.success {
		Ok(envelope.data.unwrap_or_default())
	} else {
		let message = envelope
			.into_message()
			.unwrap_or_else(|| "The account could not be linked.".to_owned());

		Err(LinkError::Rejected { status: Some(status), message })
	}
}

fn parse_envelope(body: &[u8]) -> Result<Envelope, serde_path_to_error::Error<serde_json::Error>> {
	let body = if body.iter().all(u8::is_ascii_whitespace) { b"{}".as_slice() } else { body };
	let de = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(de)
}
