use crate::types::ChannelTarget;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, error, info};

/// JSON body Slack expects inside the `payload` form field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlackPayload<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'a str>,
}

impl<'a> SlackPayload<'a> {
    pub fn new(text: &'a str, target: &'a ChannelTarget) -> Self {
        Self {
            text,
            channel: target.channel(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serializing Slack payload")
    }
}

pub struct SlackWebhook {
    client: reqwest::Client,
    url: String,
}

impl SlackWebhook {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    pub async fn post(&self, payload: &SlackPayload<'_>) -> Result<()> {
        let json = payload.to_json()?;
        let resp = self
            .client
            .post(&self.url)
            .form(&[("payload", json.as_str())])
            .send()
            .await
            .context("Slack webhook request failed")?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Slack webhook HTTP {}: {}", status, body);
        }
        debug!("Slack webhook response: {}", body);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Post `summary` to every target in order. An empty target list delivers
/// nothing. A failed post is logged and does not stop later targets.
pub async fn fanout(
    webhook: &SlackWebhook,
    summary: &str,
    channels: &[ChannelTarget],
    dry_run: bool,
) -> FanoutReport {
    let mut report = FanoutReport::default();

    if channels.is_empty() {
        info!("No Slack channels configured; nothing to post");
        return report;
    }

    for target in channels {
        if dry_run {
            info!("[dry-run] would post to {}", target);
            continue;
        }

        report.attempted += 1;
        let payload = SlackPayload::new(summary, target);
        match webhook.post(&payload).await {
            Ok(()) => {
                info!("Posted summary to {}", target);
                report.delivered += 1;
            }
            Err(e) => {
                error!("Posting to {} failed: {:#}", target, e);
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const SUMMARY: &str = "BTC: 61234.50 - ETH: 3456.78";

    fn payload_matcher(json: &str) -> Matcher {
        Matcher::UrlEncoded("payload".into(), json.into())
    }

    #[test]
    fn test_payload_omits_default_channel() {
        let payload = SlackPayload::new("hi", &ChannelTarget::Default);
        assert_eq!(payload.to_json().unwrap(), r#"{"text":"hi"}"#);

        let target = ChannelTarget::Named("#ops".to_string());
        let payload = SlackPayload::new("hi", &target);
        assert_eq!(
            payload.to_json().unwrap(),
            r##"{"text":"hi","channel":"#ops"}"##
        );
    }

    #[tokio::test]
    async fn test_default_and_named_channel() {
        let mut server = mockito::Server::new_async().await;
        let default_post = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(payload_matcher(&format!(r#"{{"text":"{}"}}"#, SUMMARY)))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;
        let ops_post = server
            .mock("POST", "/hook")
            .match_body(payload_matcher(&format!(
                r##"{{"text":"{}","channel":"#ops"}}"##,
                SUMMARY
            )))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        let webhook = SlackWebhook::new(reqwest::Client::new(), format!("{}/hook", server.url()));
        let channels = vec![
            ChannelTarget::Default,
            ChannelTarget::Named("#ops".to_string()),
        ];
        let report = fanout(&webhook, SUMMARY, &channels, false).await;

        assert_eq!(
            report,
            FanoutReport {
                attempted: 2,
                delivered: 2,
                failed: 0
            }
        );
        default_post.assert_async().await;
        ops_post.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_channels_no_posts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let webhook = SlackWebhook::new(reqwest::Client::new(), server.url());
        let report = fanout(&webhook, SUMMARY, &[], false).await;

        assert_eq!(report, FanoutReport::default());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dry_run_no_posts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let webhook = SlackWebhook::new(reqwest::Client::new(), server.url());
        let channels = vec![
            ChannelTarget::Default,
            ChannelTarget::Named("@alice".to_string()),
        ];
        let report = fanout(&webhook, SUMMARY, &channels, true).await;

        assert_eq!(report.attempted, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_post_does_not_stop_later_channels() {
        let mut server = mockito::Server::new_async().await;
        let broken = server
            .mock("POST", "/hook")
            .match_body(Matcher::Regex("channel.*%23broken".to_string()))
            .with_status(404)
            .with_body("channel_not_found")
            .expect(1)
            .create_async()
            .await;
        let ops = server
            .mock("POST", "/hook")
            .match_body(Matcher::Regex("channel.*%23ops".to_string()))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        let webhook = SlackWebhook::new(reqwest::Client::new(), format!("{}/hook", server.url()));
        let channels = vec![
            ChannelTarget::Named("#broken".to_string()),
            ChannelTarget::Named("#ops".to_string()),
        ];
        let report = fanout(&webhook, SUMMARY, &channels, false).await;

        assert_eq!(
            report,
            FanoutReport {
                attempted: 2,
                delivered: 1,
                failed: 1
            }
        );
        broken.assert_async().await;
        ops.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_counted_as_failure() {
        let webhook = SlackWebhook::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/hook".to_string(),
        );
        let channels = vec![ChannelTarget::Default, ChannelTarget::Default];
        let report = fanout(&webhook, SUMMARY, &channels, false).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 2);
    }
}
