//! Output format selection for API replies.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{error::ApiError, xml};

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// How a router renders successful replies. Errors are always JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
  #[default]
  Json,
  Xml,
}

impl Format {
  pub fn render<T: Serialize>(self, status: StatusCode, value: &T) -> Result<Response, ApiError> {
    match self {
      Format::Json => Ok((status, Json(value)).into_response()),
      Format::Xml => {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Render(e.to_string()))?;
        let body = xml::to_document(&value)?;
        Ok((status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response())
      }
    }
  }

  pub fn ok<T: Serialize>(self, value: &T) -> Result<Response, ApiError> {
    self.render(StatusCode::OK, value)
  }
}
