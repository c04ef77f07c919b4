use crate::config::Settings;
use crate::domain::message::OutboundMessage;
use crate::http::{build_client, join_url};
use crate::notify::error::SendDiagnosticsError;
use crate::notify::{SentMessage, SmsSender};
use anyhow::Context;
use serde::Deserialize;

const PROVIDER: &str = "twilio";
const API_VERSION: &str = "2010-04-01";

#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateMessageResponse {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }

    /// `proxy_url` routes the API calls through an https proxy, for restricted networks.
    pub fn from_settings(settings: &Settings, proxy_url: Option<&str>) -> anyhow::Result<Self> {
        let account_sid = settings.twilio_account_sid_or_blank();
        let auth_token = settings.twilio_auth_token_or_blank();
        let http = build_client(settings.http_timeout(), proxy_url)
            .context("failed to build Twilio http client")?;
        Ok(Self::new(
            http,
            settings.twilio_base_url.clone(),
            account_sid,
            auth_token,
        ))
    }

    fn messages_url(&self) -> String {
        join_url(
            &self.base_url,
            &format!("{API_VERSION}/Accounts/{}/Messages.json", self.account_sid),
        )
    }
}

#[async_trait::async_trait]
impl SmsSender for TwilioClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<SentMessage> {
        let form = [
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];

        let res = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .context("Twilio request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Twilio response body")?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<ApiErrorResponse>(&text).ok();
            let code = parsed.as_ref().and_then(|e| e.code);
            let detail = parsed
                .and_then(|e| e.message)
                .unwrap_or(text);
            return Err(SendDiagnosticsError {
                provider: PROVIDER,
                status: status.as_u16(),
                code,
                detail,
            }
            .into());
        }

        let created = serde_json::from_str::<CreateMessageResponse>(&text)
            .with_context(|| format!("failed to parse Twilio response: {text}"))?;
        Ok(SentMessage {
            sid: created.sid,
            status: created.status,
        })
    }
}
