//! Customer API client: the one place that talks to the remote service.

pub mod error;

use reqwest::Client;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::form::{FormState, MediaFile};
pub use error::ApiError;

/// Nested address as the server stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// A customer record as returned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, rename = "videoUrl", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// Owned snapshot of the form at submission time.
///
/// Dispatching a save detaches the payload from the live form, so the user
/// keeps their input (and can keep typing) if the request fails.
#[derive(Clone, Debug, PartialEq)]
pub struct SavePayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub terms_accepted: bool,
    pub image: Option<MediaFile>,
    pub video: Option<MediaFile>,
}

impl SavePayload {
    pub fn from_form(form: &FormState) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            city: form.city.as_str().to_string(),
            state: form.state.as_str().to_string(),
            country: form.country.as_str().to_string(),
            terms_accepted: form.terms_accepted,
            image: form.image.clone(),
            video: form.video.clone(),
        }
    }

    /// Multipart body with the bracketed address field names the server
    /// expects; binary parts go in only when an attachment is present.
    fn to_multipart(&self) -> Result<multipart::Form, ApiError> {
        let mut form = multipart::Form::new()
            .text("name", self.name.clone())
            .text("email", self.email.clone())
            .text("phone", self.phone.clone())
            .text("address[city]", self.city.clone())
            .text("address[state]", self.state.clone())
            .text("address[country]", self.country.clone())
            .text(
                "termsAndConditions",
                if self.terms_accepted { "true" } else { "false" },
            );

        if let Some(image) = &self.image {
            form = form.part("image", media_part(image)?);
        }
        if let Some(video) = &self.video {
            form = form.part("video", media_part(video)?);
        }

        Ok(form)
    }
}

fn media_part(media: &MediaFile) -> Result<multipart::Part, ApiError> {
    let part = multipart::Part::bytes(media.bytes.clone())
        .file_name(media.file_name.clone())
        .mime_str(media.mime())?;
    Ok(part)
}

/// HTTP client for the customer collection.
pub struct ApiClient {
    client: Client,
    customers_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent(concat!("customer-manager/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build http client");

        Self {
            client,
            customers_url: format!("{}/api/customers", base_url.trim_end_matches('/')),
        }
    }

    /// Full collection snapshot. Called on startup and after every
    /// successful mutation; never diffed or merged client-side.
    pub async fn fetch_all(&self) -> Result<Vec<Customer>, ApiError> {
        debug!(url = %self.customers_url, "fetching customers");

        let response = self.client.get(&self.customers_url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                verb: "fetch",
                status: response.status(),
            });
        }

        let customers: Vec<Customer> = response.json().await?;
        debug!(count = customers.len(), "fetched customers");
        Ok(customers)
    }

    pub async fn create(&self, payload: &SavePayload) -> Result<Customer, ApiError> {
        debug!(url = %self.customers_url, name = %payload.name, "creating customer");

        let response = self
            .client
            .post(&self.customers_url)
            .multipart(payload.to_multipart()?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                verb: "save",
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }

    pub async fn update(&self, id: &str, payload: &SavePayload) -> Result<Customer, ApiError> {
        let url = format!("{}/{}", self.customers_url, id);
        debug!(url = %url, "updating customer");

        let response = self
            .client
            .put(&url)
            .multipart(payload.to_multipart()?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                verb: "save",
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }

    /// Delete by id. The response body carries no contract we consume.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.customers_url, id);
        debug!(url = %url, "deleting customer");

        let response = self.client.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                verb: "delete",
                status: response.status(),
            });
        }

        Ok(())
    }
}
