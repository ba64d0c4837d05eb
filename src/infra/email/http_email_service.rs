use crate::domain::ports::{EmailService, OutboundEmail};
use crate::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Delivers mail through the external relay service. The relay owns retries;
/// a failure here surfaces to the caller (the background worker) which marks
/// the job FAILED.
pub struct HttpEmailService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct AttachmentPayload {
    filename: String,
    content_base64: String,
}

#[derive(Serialize)]
struct RelayPayload {
    from_alias: String,
    to_addr: String,
    subject: String,
    html_body: String,
    attachments: Vec<AttachmentPayload>,
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send(&self, email: &OutboundEmail) -> Result<(), AppError> {
        let attachments = email.attachment.iter().map(|a| AttachmentPayload {
            filename: a.filename.clone(),
            content_base64: general_purpose::STANDARD.encode(&a.content),
        }).collect();

        let payload = RelayPayload {
            from_alias: "training".to_string(),
            to_addr: email.to.clone(),
            subject: email.subject.clone(),
            html_body: email.html_body.clone(),
            attachments,
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Email service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Email service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
