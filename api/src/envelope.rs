//! The backend's JSON response envelope.
//!
//! Every endpoint answers with some subset of
//! `{success, message, data, records, totalRecords, totalPages, token, user, filename}`.
//! [`Envelope`] decodes the union leniently; the `into_*` helpers turn it into
//! the typed shape a given call expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de;
use crate::error::ApiError;

const FALLBACK_REJECTION: &str = "Request failed";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "de::bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub records: Option<Vec<Value>>,
    #[serde(default, rename = "totalRecords", deserialize_with = "de::u64_or_zero")]
    pub total_records: u64,
    #[serde(default, rename = "totalPages", deserialize_with = "de::u64_or_zero")]
    pub total_pages: u64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub filename: Option<String>,
}

impl Envelope {
    /// Parse a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is not a JSON object.
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("{e}: {}", snippet(body))))
    }

    /// Fail with the remote's own message when `success` is false.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] carrying the remote message.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected(self.message.unwrap_or_else(|| FALLBACK_REJECTION.to_owned())))
        }
    }

    /// Paginated list payload. A missing `records` field is an empty page.
    #[must_use]
    pub fn into_page(self) -> Page<Value> {
        let records = self.records.unwrap_or_default();
        let total_records = if self.total_records == 0 { records.len() as u64 } else { self.total_records };
        let total_pages = if self.total_pages == 0 && !records.is_empty() { 1 } else { self.total_pages };
        Page { records, total_records, total_pages }
    }

    /// Single-record payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when `data` is absent or null.
    pub fn into_data(self) -> Result<Value, ApiError> {
        match self.data {
            Some(Value::Null) | None => Err(ApiError::Decode("response has no data".into())),
            Some(data) => Ok(data),
        }
    }

    /// Mutation acknowledgement.
    #[must_use]
    pub fn into_ack(self) -> Ack {
        Ack { message: self.message.unwrap_or_else(|| "Saved".to_owned()), data: self.data.filter(|d| !d.is_null()) }
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    #[serde(rename = "totalRecords")]
    pub total_records: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn empty() -> Self {
        Self { records: Vec::new(), total_records: 0, total_pages: 0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { records: self.records.into_iter().map(f).collect(), total_records: self.total_records, total_pages: self.total_pages }
    }
}

impl Page<Value> {
    /// Decode every record into a typed entity.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] naming the first record that fails.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Page<T>, ApiError> {
        let mut records = Vec::with_capacity(self.records.len());
        for (idx, raw) in self.records.into_iter().enumerate() {
            let record = serde_json::from_value(raw).map_err(|e| ApiError::Decode(format!("record {idx}: {e}")))?;
            records.push(record);
        }
        Ok(Page { records, total_records: self.total_records, total_pages: self.total_pages })
    }
}

/// Successful mutation: the remote's message plus whatever it echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ack {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn snippet(body: &str) -> &str {
    let end = body.char_indices().nth(200).map_or(body.len(), |(i, _)| i);
    &body[..end]
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
