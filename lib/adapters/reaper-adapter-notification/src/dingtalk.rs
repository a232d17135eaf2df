use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use reaper_domain::{NotificationMessage, NotificationsConfig};
use reaper_ports::NotificationPort;

use crate::signer::sign;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Robot credentials. Missing values are sent as empty strings and left
/// for the endpoint to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotCredentials {
    pub access_token: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
struct MarkdownPayload<'a> {
    msgtype: &'static str,
    markdown: MarkdownBody<'a>,
}

#[derive(Debug, Serialize)]
struct MarkdownBody<'a> {
    title: &'a str,
    text: &'a str,
}

impl<'a> From<&'a NotificationMessage> for MarkdownPayload<'a> {
    fn from(message: &'a NotificationMessage) -> Self {
        Self {
            msgtype: "markdown",
            markdown: MarkdownBody {
                title: &message.title,
                text: &message.text,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RobotReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Posts markdown reports to a DingTalk custom robot webhook.
#[derive(Debug, Clone)]
pub struct DingTalkNotifier {
    client: reqwest::Client,
    endpoint: String,
    credentials: RobotCredentials,
}

impl DingTalkNotifier {
    pub fn new(endpoint: impl Into<String>, credentials: RobotCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build robot webhook client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        })
    }

    pub fn from_config(config: &NotificationsConfig) -> Result<Self> {
        let credentials = RobotCredentials {
            access_token: config.access_token.clone().unwrap_or_default(),
            secret: config.secret.clone().unwrap_or_default(),
        };
        Self::new(config.endpoint.clone(), credentials)
    }

    fn request_url(&self, timestamp_ms: i64) -> Result<Url> {
        let signature = sign(timestamp_ms, &self.credentials.secret)?;
        let timestamp = timestamp_ms.to_string();
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("access_token", self.credentials.access_token.as_str()),
                ("timestamp", timestamp.as_str()),
                ("sign", signature.as_str()),
            ],
        )
        .with_context(|| format!("invalid robot endpoint {}", self.endpoint))
    }
}

#[async_trait]
impl NotificationPort for DingTalkNotifier {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<()> {
        let url = self.request_url(chrono::Utc::now().timestamp_millis())?;
        let response = self
            .client
            .post(url)
            .json(&MarkdownPayload::from(message))
            .send()
            .await
            .context("robot webhook request failed")?
            .error_for_status()
            .context("robot webhook returned an error status")?;
        let body = response
            .text()
            .await
            .context("failed to read robot webhook reply")?;
        check_reply(&body)?;
        info!(title = %message.title, "report sent to robot webhook");
        Ok(())
    }
}

fn check_reply(body: &str) -> Result<()> {
    match serde_json::from_str::<RobotReply>(body) {
        Ok(reply) if reply.errcode != 0 => {
            anyhow::bail!("robot webhook rejected report: {} ({})", reply.errmsg, reply.errcode)
        }
        Ok(_) => Ok(()),
        Err(e) => {
            debug!(error = %e, body, "unrecognised robot webhook reply");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn notifier() -> DingTalkNotifier {
        DingTalkNotifier::new(
            "https://oapi.dingtalk.com/robot/send",
            RobotCredentials {
                access_token: "tok123".to_string(),
                secret: "SECtestsecret".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let message = NotificationMessage::new("Slow operations killed", "### body");
        let payload = serde_json::to_value(MarkdownPayload::from(&message)).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "msgtype": "markdown",
                "markdown": { "title": "Slow operations killed", "text": "### body" },
            })
        );
    }

    #[test]
    fn test_request_url_carries_signed_params() {
        let url = notifier().request_url(1_700_000_000_000).unwrap();
        assert_eq!(url.path(), "/robot/send");

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                ("access_token".to_string(), "tok123".to_string()),
                ("timestamp".to_string(), "1700000000000".to_string()),
                (
                    "sign".to_string(),
                    "7LVwF0dAF3/+MRRulbpE4y72Ogzykc6bS2nG4I99T4s=".to_string()
                ),
            ]
        );
        assert!(
            url.as_str()
                .contains("sign=7LVwF0dAF3%2F%2BMRRulbpE4y72Ogzykc6bS2nG4I99T4s%3D")
        );
    }

    #[test]
    fn test_missing_credentials_are_passed_through_empty() {
        let config = NotificationsConfig {
            enabled: true,
            ..Default::default()
        };
        let notifier = DingTalkNotifier::from_config(&config).unwrap();
        assert_eq!(notifier.credentials, RobotCredentials::default());

        let url = notifier.request_url(1).unwrap();
        assert!(url.as_str().contains("access_token=&"));
    }

    #[test]
    fn test_invalid_endpoint_is_an_error() {
        let notifier = DingTalkNotifier::new("not a url", RobotCredentials::default()).unwrap();
        assert!(notifier.request_url(1).is_err());
    }

    /// Accepts one request, answers it with `status` and `body`, and
    /// hands back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/robot/send", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            request
        });
        (endpoint, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(raw).unwrap()
    }

    // Proxy variables from the environment must not reroute loopback traffic.
    fn local_notifier(endpoint: String) -> DingTalkNotifier {
        DingTalkNotifier {
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            endpoint,
            credentials: RobotCredentials {
                access_token: "tok123".to_string(),
                secret: "SECtestsecret".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_send_posts_signed_markdown() {
        let (endpoint, server) = serve_once("200 OK", r#"{"errcode":0,"errmsg":"ok"}"#).await;
        let message = NotificationMessage::new("Slow operations killed", "#### 1. app1");

        local_notifier(endpoint)
            .send_notification(&message)
            .await
            .unwrap();

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("POST /robot/send?access_token=tok123&timestamp="));
        assert!(head.contains("&sign="));
        assert!(head.to_ascii_lowercase().contains("content-type: application/json"));

        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "msgtype": "markdown",
                "markdown": { "title": "Slow operations killed", "text": "#### 1. app1" },
            })
        );
    }

    #[tokio::test]
    async fn test_error_status_fails_dispatch() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "{}").await;
        let message = NotificationMessage::new("t", "x");

        let err = local_notifier(endpoint)
            .send_notification(&message)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("error status"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_reply_fails_dispatch() {
        let (endpoint, server) =
            serve_once("200 OK", r#"{"errcode":310000,"errmsg":"sign not match"}"#).await;
        let message = NotificationMessage::new("t", "x");

        let err = local_notifier(endpoint)
            .send_notification(&message)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("sign not match"));
        server.await.unwrap();
    }

    #[test]
    fn test_check_reply() {
        assert!(check_reply(r#"{"errcode":0,"errmsg":"ok"}"#).is_ok());
        let err = check_reply(r#"{"errcode":310000,"errmsg":"sign not match"}"#).unwrap_err();
        assert!(err.to_string().contains("sign not match"));
        assert!(check_reply("").is_ok());
    }
}
