//! Walks through a FlexMLS login: build the authorize URL, then (when a code is supplied)
//! exchange it and print the normalized account profile.
//!
//! ```sh
//! FLEXMLS_CLIENT_ID=... FLEXMLS_CLIENT_SECRET=... cargo run --example flexmls_login
//! FLEXMLS_CODE=... cargo run --example flexmls_login
//! ```

// std
use std::env;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_flexmls::{auth::ScopeSet, config::ClientConfig, flows::ReqwestProviderClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = env::var("FLEXMLS_CLIENT_ID").unwrap_or_else(|_| "demo-client".into());
	let mut config = ClientConfig::builder(client_id)
		.redirect_uri(Url::parse("https://app.example.com/oauth/callback")?)
		.user_agent("FlexMlsDemo/1.0");

	if let Ok(secret) = env::var("FLEXMLS_CLIENT_SECRET") {
		config = config.client_secret(secret);
	}

	let client = ReqwestProviderClient::new(config.build()?);
	let session = client.start_authorization(&ScopeSet::default())?;

	println!("Send your user to {}.", &session.authorize_url);
	println!("Expected state: {}.", &session.state);

	let Ok(code) = env::var("FLEXMLS_CODE") else {
		println!("Set FLEXMLS_CODE after the redirect to finish the login.");

		return Ok(());
	};
	// A redirect handler would call `complete_authorization` with the stored session and the
	// returned `state`; this process no longer holds the session that produced the code.
	let token = client.exchange_code(&code, None).await?;
	let profile = client.resource_owner(&token).await?;

	println!("Signed in as {} ({}).", profile.name().unwrap_or("?"), profile.id().unwrap_or("?"));
	println!("Active: {}.", profile.is_active());

	if let Some(email) = profile.primary_email() {
		println!("Primary email: {email}.");
	}

	Ok(())
}
