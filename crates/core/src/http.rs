use anyhow::Context;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the client every provider uses. Proxies from the environment are ignored;
/// only `proxy_url` is honoured, and only for https traffic.
pub fn build_client(timeout: Duration, proxy_url: Option<&str>) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .no_proxy();

    if let Some(url) = proxy_url {
        let proxy = reqwest::Proxy::https(url)
            .with_context(|| format!("invalid https proxy URL: {url}"))?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("failed to build http client")
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
