//! WebFaction DNS API client.
//!
//! The WebFaction control panel exposes an XML-RPC endpoint. Only the
//! three methods a DDNS run needs are implemented: `login`,
//! `delete_dns_override` and `create_dns_override`.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;

const DEFAULT_API_URL: &str = "https://api.webfaction.com/";

/// Remote DNS management API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Point the domain's override record at a new IP address.
    ///
    /// This is a destructive replace: existing override records for the
    /// domain are deleted before the new one is created, and there is no
    /// rollback if the create step fails.
    async fn replace_override(&self, domain: &str, ip_address: &str) -> Result<()>;
}

/// Session handle returned by `login`, required by all subsequent calls.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
}

impl Session {
    /// The opaque session id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// XML-RPC client for the WebFaction API.
pub struct WebfactionClient {
    client: reqwest::Client,
    username: String,
    password: String,
    api_url: String,
}

impl WebfactionClient {
    /// Create a client against the production API endpoint.
    pub fn new(username: String, password: String) -> Self {
        Self::with_api_url(username, password, DEFAULT_API_URL.to_string())
    }

    /// Create a client with a custom endpoint (for testing).
    pub fn with_api_url(username: String, password: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            username,
            password,
            api_url,
        }
    }

    /// Authenticate and obtain a session handle.
    ///
    /// The response array is `(session_id, account_struct)`; the account
    /// struct is ignored.
    pub async fn login(&self) -> Result<Session> {
        let body = self
            .call("login", &[&self.username, &self.password])
            .await?;

        let id = text_between(&body, "<string>", "</string>")
            .ok_or_else(|| DdnsError::Api {
                method: "login".to_string(),
                message: "No session id in response".to_string(),
            })?
            .to_string();

        tracing::debug!(username = %self.username, "Logged in to WebFaction API");
        Ok(Session { id })
    }

    /// Delete all existing override records for the domain.
    pub async fn delete_dns_override(&self, session: &Session, domain: &str) -> Result<()> {
        self.call("delete_dns_override", &[&session.id, domain])
            .await?;
        tracing::debug!(domain = domain, "Deleted DNS override");
        Ok(())
    }

    /// Create an override record pointing the domain at the IP address.
    pub async fn create_dns_override(
        &self,
        session: &Session,
        domain: &str,
        ip_address: &str,
    ) -> Result<()> {
        self.call("create_dns_override", &[&session.id, domain, ip_address])
            .await?;
        tracing::debug!(domain = domain, ip = ip_address, "Created DNS override");
        Ok(())
    }

    /// Perform one XML-RPC method call and return the raw response body.
    ///
    /// All WebFaction methods take string parameters only.
    async fn call(&self, method: &str, params: &[&str]) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "text/xml")
            .body(build_method_call(method, params))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DdnsError::Api {
                method: method.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let text = response.text().await?;

        if text.contains("<fault>") {
            let message = text
                .split("<name>faultString</name>")
                .nth(1)
                .and_then(|rest| text_between(rest, "<string>", "</string>"))
                .unwrap_or("Unknown fault")
                .to_string();

            return Err(DdnsError::Api {
                method: method.to_string(),
                message,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl DnsApi for WebfactionClient {
    async fn replace_override(&self, domain: &str, ip_address: &str) -> Result<()> {
        let session = self.login().await?;
        self.delete_dns_override(&session, domain).await?;
        self.create_dns_override(&session, domain, ip_address).await
    }
}

/// Build an XML-RPC `methodCall` document with string parameters.
fn build_method_call(method: &str, params: &[&str]) -> String {
    let mut body = String::from("<?xml version=\"1.0\"?><methodCall>");
    body.push_str(&format!("<methodName>{}</methodName><params>", method));

    for param in params {
        body.push_str(&format!(
            "<param><value><string>{}</string></value></param>",
            xml_escape(param)
        ));
    }

    body.push_str("</params></methodCall>");
    body
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn text_between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    text.split(open).nth(1)?.split(close).next()
}
