//! Upload requester.
//!
//! Two transports:
//!
//! - [`UploadTransport::Multipart`]: `PUT <base>/upload` with the file under
//!   form field `file`; custom labels go in the `x-amz-meta-customLabels`
//!   header or the `customLabels` field depending on [`LabelsPlacement`].
//! - [`UploadTransport::DirectStorage`]: `PUT <storage-root>/<file-name>` with
//!   the raw bytes as body, the file's `Content-Type`, and the labels header.
//!
//! Callers either hand over the file ([`UploadRequester::upload_file`]) or let
//! the requester read the form's selected file ([`UploadRequester::upload_selected`]).

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{ApiConfig, LabelsPlacement};
use crate::error::{PhotoError, ValidationError};
use crate::labels::is_header_safe;
use crate::types::{PhotoFile, UploadForm, UploadReceipt, UploadRequest};
use crate::{CUSTOM_LABELS_FIELD, CUSTOM_LABELS_HEADER};

/// How an upload reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadTransport {
    /// Multipart PUT to the gateway's `/upload` route
    #[default]
    Multipart,
    /// Raw PUT straight to the storage bucket
    DirectStorage,
}

/// Issues upload requests against the gateway or the storage bucket.
#[derive(Clone)]
pub struct UploadRequester {
    client: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl UploadRequester {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: Arc<ApiConfig>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Upload a file the caller already holds.
    ///
    /// `None` fails with [`ValidationError::MissingFile`] before any request is made.
    pub async fn upload_file(
        &self,
        file: Option<PhotoFile>,
        raw_labels: &str,
        transport: UploadTransport,
    ) -> Result<UploadReceipt, PhotoError> {
        let Some(file) = file else {
            warn!("No photo selected for upload");
            return Err(ValidationError::MissingFile.into());
        };
        self.upload(UploadRequest::new(file, raw_labels), transport).await
    }

    /// Upload whatever the form has selected, reading the file from disk.
    ///
    /// The form itself is not modified; apply the outcome with
    /// [`UploadForm::apply_outcome`] to reset it on success.
    pub async fn upload_selected(
        &self,
        form: &UploadForm,
        transport: UploadTransport,
    ) -> Result<UploadReceipt, PhotoError> {
        let Some(path) = form.selected.as_deref() else {
            warn!("No photo selected for upload");
            return Err(ValidationError::MissingFile.into());
        };
        let file = PhotoFile::read(path).await.map_err(|e| ValidationError::UnreadableFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(file = file.name.as_str(), size = file.bytes.len(), "Read selected file");
        self.upload(UploadRequest::new(file, &form.custom_labels), transport).await
    }

    /// Upload a prepared request with the chosen transport.
    pub async fn upload(
        &self,
        request: UploadRequest,
        transport: UploadTransport,
    ) -> Result<UploadReceipt, PhotoError> {
        let labels = request.labels_value();
        debug!(file = request.file.name.as_str(), labels = labels.as_str(), ?transport, "Preparing upload");

        match transport {
            UploadTransport::Multipart => self.put_multipart(request.file, labels).await,
            UploadTransport::DirectStorage => self.put_direct(request.file, labels).await,
        }
    }

    async fn put_multipart(&self, file: PhotoFile, labels: String) -> Result<UploadReceipt, PhotoError> {
        let url = self.config.endpoint("upload");
        let content_type = file.content_type_or_default().to_string();
        let part = Part::bytes(file.bytes).file_name(file.name).mime_str(&content_type)?;
        // Raw file names in Content-Disposition, as browsers send them
        let mut form = Form::new().percent_encode_noop().part("file", part);

        let mut builder = self.config.authorize(self.client.put(url.clone()));
        match self.config.labels_placement {
            LabelsPlacement::Header => builder = builder.header(CUSTOM_LABELS_HEADER, header_labels(labels)?),
            LabelsPlacement::Field => form = form.text(CUSTOM_LABELS_FIELD, labels),
        }

        self.send(builder.multipart(form), url).await
    }

    async fn put_direct(&self, file: PhotoFile, labels: String) -> Result<UploadReceipt, PhotoError> {
        let url = self.config.storage_url(&file.name).ok_or(ValidationError::MissingStorageRoot)?;
        let builder = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, file.content_type_or_default())
            .header(CUSTOM_LABELS_HEADER, header_labels(labels)?)
            .body(file.bytes);

        self.send(builder, url).await
    }

    async fn send(&self, builder: RequestBuilder, url: Url) -> Result<UploadReceipt, PhotoError> {
        debug!(url = %url, "Sending PUT request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Received upload response");

        if !status.is_success() {
            error!(status = status.as_u16(), body = body.as_str(), "Upload request failed");
            return Err(PhotoError::request(status.as_u16(), Some(body)));
        }

        info!(url = %url, "Photo uploaded successfully");
        Ok(UploadReceipt { status: status.as_u16(), location: url.to_string(), body })
    }
}

fn header_labels(labels: String) -> Result<String, ValidationError> {
    if is_header_safe(&labels) {
        Ok(labels)
    } else {
        Err(ValidationError::InvalidLabels(labels))
    }
}
