//! Starts a connection flow, then finishes it from a pasted callback URL.
//!
//! ```sh
//! SOCIAL_CONNECT_ORIGIN=https://app.example.com \
//! SOCIAL_CONNECT_TWITTER_CLIENT_ID=... \
//! SOCIAL_CONNECT_LINK_ENDPOINT=https://api.example.com/api/v1/social-suit/callback/oauth \
//! cargo run --example connect_platform -- twitter
//! ```

// std
use std::{env, io, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use social_connect::{
	callback::CallbackParams,
	config::ConnectorConfig,
	flow::{Completion, Connector},
	link::ReqwestAccountLinker,
	session::FileSessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let platform = env::args().nth(1).unwrap_or_else(|| "twitter".into());
	let config = ConnectorConfig::from_env()?;
	let store = FileSessionStore::open(env::temp_dir().join("social_connect_demo.json"))?;
	let connector = Connector::from_config(Arc::new(store), config)?;
	let redirect = connector.initiate(&platform, Some("/dashboard")).await?;

	println!("Send your user to {}.", redirect.url);
	println!("Paste the full callback URL once the provider redirects back:");

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let params = CallbackParams::from_url(&Url::parse(line.trim())?);
	let endpoint = env::var("SOCIAL_CONNECT_LINK_ENDPOINT")
		.map_err(|_| eyre!("SOCIAL_CONNECT_LINK_ENDPOINT must point at the linking service."))?;
	let mut linker = ReqwestAccountLinker::new(Url::parse(&endpoint)?);

	if let Ok(token) = env::var("SOCIAL_CONNECT_LINK_TOKEN") {
		linker = linker.with_bearer_token(token);
	}

	match connector.complete(&params, &linker).await? {
		Completion::Connected { platform, navigate_to, account } => {
			println!(
				"Connected {platform} account {}; navigate to {navigate_to}.",
				account.username.as_deref().unwrap_or("<unknown>")
			);
		},
		Completion::Failed { message } => eprintln!("{message}"),
	}

	Ok(())
}
