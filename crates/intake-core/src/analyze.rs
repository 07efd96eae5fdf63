//! Image understanding seam: guess a student's name and phone number from a
//! photographed form.

use std::{convert::Infallible, future::Future};

use serde::{Deserialize, Serialize};

/// Fields recognised in an image. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub student_name:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub student_phone: Option<String>,
}

/// Sends an image to a recognition service.
pub trait ImageAnalyzer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// `image_base64` is the bare base64 payload, without a data-URL prefix.
  fn extract<'a>(
    &'a self,
    image_base64: &'a str,
  ) -> impl Future<Output = Result<ExtractedData, Self::Error>> + Send + 'a;
}

/// Analyzer used when no recognition service is configured. Always returns
/// empty data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnalyzer;

impl ImageAnalyzer for DisabledAnalyzer {
  type Error = Infallible;

  async fn extract(&self, image_base64: &str) -> Result<ExtractedData, Infallible> {
    tracing::debug!(bytes = image_base64.len(), "image analysis disabled; returning no data");
    Ok(ExtractedData::default())
  }
}

const DATA_URL_PREFIXES: [&str; 4] = [
  "data:image/png;base64,",
  "data:image/jpeg;base64,",
  "data:image/jpg;base64,",
  "data:image/webp;base64,",
];

/// Strip a leading `data:image/<png|jpeg|jpg|webp>;base64,` prefix, if any.
pub fn strip_data_url_prefix(image: &str) -> &str {
  DATA_URL_PREFIXES
    .iter()
    .find_map(|prefix| image.strip_prefix(prefix))
    .unwrap_or(image)
}
