//! Leaked `WhatsApp` profile pictures, addressed by normalized phone number.
//!
//! The database serves `{base}/{phone}.jpg`; any successful response means a
//! picture exists for the number.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::Serialize;

use crate::http::{check_response, join_url, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Debug, Serialize)]
pub struct WhatsappPicture {
    pub phone: String,
    pub image_url: String,
}

pub struct WhatsappAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl WhatsappAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn image_url(&self, phone: &str) -> String {
        join_url(
            &self.base_url,
            &format!("{}.jpg", urlencoding::encode(phone)),
        )
    }

    async fn fetch(&self, phone: &str) -> Result<Option<WhatsappPicture>, SourceError> {
        let image_url = self.image_url(phone);
        let resp = self.http.get(&image_url).send().await?;
        // Missing pictures are sometimes reported as 403 by the CDN.
        if resp.status() == 403 {
            return Ok(None);
        }
        let Some(_) = check_response(resp).await? else {
            return Ok(None);
        };
        Ok(Some(WhatsappPicture {
            phone: phone.to_string(),
            image_url,
        }))
    }
}

#[async_trait]
impl SourceAdapter for WhatsappAdapter {
    fn id(&self) -> &'static str {
        "whatsapp-db"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Phone]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}
