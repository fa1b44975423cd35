//! Response envelope decoding.
//!
//! Every response body is a JSON object holding either an `error` object or
//! the resource payload under the resource's plural name, e.g.
//! `{"creditor_bank_accounts": {...}}`. List responses add a `meta` object.

use reqwest::StatusCode;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};

use super::paginated::{ListMeta, ListPage};
use crate::error::ApiError;
use crate::{Error, Result};

/// A resource that the API wraps in an envelope.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Key wrapping the resource in request bodies and response envelopes.
    const ENVELOPE_KEY: &'static str;
}

pub(crate) type Envelope = Map<String, Value>;

/// Decode the top-level envelope, turning error payloads and non-success
/// statuses into [`Error::Api`].
///
/// An `error` object wins over the HTTP status: a 200 carrying an error is
/// still an error, and its decoded form is returned as-is.
pub(crate) fn decode_envelope(status: StatusCode, body: &[u8]) -> Result<Envelope> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => return Err(Error::Json(e)),
        Err(_) => {
            return Err(ApiError::from_status(status, &String::from_utf8_lossy(body)).into());
        }
    };

    let mut envelope = match value {
        Value::Object(map) => map,
        _ if !status.is_success() => return Err(ApiError::from_status(status, "").into()),
        other => {
            return Err(Error::Json(serde_json::Error::custom(format!(
                "expected a JSON object envelope, got {}",
                other
            ))))
        }
    };

    match envelope.remove("error") {
        None | Some(Value::Null) => {}
        Some(err) => {
            let mut api: ApiError = serde_json::from_value(err)?;
            if api.code == 0 {
                api.code = status.as_u16();
            }
            tracing::debug!(
                status = status.as_u16(),
                error_type = %api.error_type,
                request_id = ?api.request_id,
                "API returned an error envelope"
            );
            return Err(api.into());
        }
    }

    if !status.is_success() {
        return Err(ApiError::from_status(status, "").into());
    }

    Ok(envelope)
}

/// Take the single resource payload out of the envelope.
pub(crate) fn take_resource<T: Resource>(envelope: &mut Envelope) -> Result<T> {
    take_payload(envelope, T::ENVELOPE_KEY)
}

/// Take a page of resources and its pagination metadata out of the envelope.
pub(crate) fn take_page<T: Resource>(envelope: &mut Envelope) -> Result<ListPage<T>> {
    let items: Vec<T> = take_payload(envelope, T::ENVELOPE_KEY)?;
    let meta = match envelope.remove("meta") {
        None | Some(Value::Null) => ListMeta::default(),
        Some(meta) => serde_json::from_value(meta)?,
    };
    Ok(ListPage { items, meta })
}

fn take_payload<P: DeserializeOwned>(envelope: &mut Envelope, key: &'static str) -> Result<P> {
    match envelope.remove(key) {
        None | Some(Value::Null) => Err(Error::MissingResult { resource: key }),
        Some(payload) => Ok(serde_json::from_value(payload)?),
    }
}
