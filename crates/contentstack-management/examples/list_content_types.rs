//! List the content types of one stack.
//!
//! ```text
//! CONTENTSTACK_API_KEY=blt... CONTENTSTACK_MANAGEMENT_TOKEN=cs... \
//!     cargo run -p contentstack-management --example list_content_types
//! ```
//!
//! Without a management token, `CONTENTSTACK_EMAIL` and `CONTENTSTACK_PASSWORD`
//! are used to log in first. `CONTENTSTACK_HOST` overrides the API host.

use std::env;

use anyhow::{bail, Context};
use contentstack_management::{ManagementClient, StackAuth, UserCredentials, DEFAULT_BASE_URL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let host = env::var("CONTENTSTACK_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let api_key = env::var("CONTENTSTACK_API_KEY").context("CONTENTSTACK_API_KEY is not set")?;

    let client = ManagementClient::new(&host).with_context(|| format!("bad host {host}"))?;
    let mut auth = StackAuth::new(api_key);

    if let Ok(token) = env::var("CONTENTSTACK_MANAGEMENT_TOKEN") {
        auth = auth.with_management_token(token);
    } else {
        let (Ok(email), Ok(password)) = (
            env::var("CONTENTSTACK_EMAIL"),
            env::var("CONTENTSTACK_PASSWORD"),
        ) else {
            bail!("set CONTENTSTACK_MANAGEMENT_TOKEN, or CONTENTSTACK_EMAIL with CONTENTSTACK_PASSWORD");
        };
        client
            .login(&UserCredentials::new(email, password))
            .await
            .context("login failed")?;
    }

    if let Ok(branch) = env::var("CONTENTSTACK_BRANCH") {
        auth = auth.with_branch(branch);
    }

    let stack = client.stack(auth)?;
    let content_types = stack
        .content_types()
        .fetch_all()
        .await
        .context("failed to list content types")?;

    for content_type in &content_types {
        println!("{:<32} {}", content_type.uid.as_str(), content_type.title);
    }
    println!("{} content type(s)", content_types.len());

    Ok(())
}
