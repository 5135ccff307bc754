//! Response body decoding.
//!
//! A [`CallResult`] is interpreted in this order:
//!
//! 1. A stored call error is returned unchanged.
//! 2. A non-200 status becomes an error. Its message is the envelope's
//!    message field when envelope decoding is on, the raw body otherwise.
//! 3. A 200 body is parsed as JSON. With an envelope, the business code must
//!    be 200 and the data field is the payload; without, the whole document
//!    is.
//! 4. The payload is deserialized into the destination, which is only
//!    written when every step succeeds.

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::CallResult;
use super::envelope::EnvelopeExt;
use crate::ClientError;

/// Default name of the envelope's business code field.
pub const DEFAULT_CODE_FIELD: &str = "code";
/// Default name of the envelope's payload field.
pub const DEFAULT_DATA_FIELD: &str = "data";
/// Default name of the envelope's message field.
pub const DEFAULT_MESSAGE_FIELD: &str = "message";

/// Business code that marks an envelope as successful.
const ENVELOPE_OK: i64 = 200;

/// Discriminator that protobuf JSON reserves for `Any`.
const TYPE_URL_KEY: &str = "@type";

/// How a response body is interpreted.
///
/// ```
/// use restc::DecodeOptions;
///
/// let options = DecodeOptions::envelope().code_field("errno").data_field("result");
/// assert!(options.is_envelope());
/// assert!(!DecodeOptions::raw().is_envelope());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    wrap_envelope: bool,
    code_field: String,
    data_field: String,
    message_field: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            wrap_envelope: false,
            code_field: DEFAULT_CODE_FIELD.to_owned(),
            data_field: DEFAULT_DATA_FIELD.to_owned(),
            message_field: DEFAULT_MESSAGE_FIELD.to_owned(),
        }
    }
}

impl DecodeOptions {
    /// Decode the body as a plain JSON document.
    pub fn raw() -> Self {
        Self::default()
    }

    /// Decode the body as a `{code, message, data}` envelope.
    pub fn envelope() -> Self {
        Self::default().wrap_envelope(true)
    }

    /// Turn envelope decoding on or off.
    pub fn wrap_envelope(mut self, enabled: bool) -> Self {
        self.wrap_envelope = enabled;
        self
    }

    /// Name of the business code field.
    pub fn code_field(mut self, name: impl Into<String>) -> Self {
        self.code_field = name.into();
        self
    }

    /// Name of the payload field.
    pub fn data_field(mut self, name: impl Into<String>) -> Self {
        self.data_field = name.into();
        self
    }

    /// Name of the message field.
    pub fn message_field(mut self, name: impl Into<String>) -> Self {
        self.message_field = name.into();
        self
    }

    /// Whether envelope decoding is on.
    pub fn is_envelope(&self) -> bool {
        self.wrap_envelope
    }
}

fn parse_json(body: &Bytes) -> Result<Value, ClientError> {
    serde_json::from_slice(body).map_err(|e| {
        ClientError::decode(format!(
            "unmarshal json error: {}, response body: {}",
            e,
            String::from_utf8_lossy(body)
        ))
    })
}

/// Read the business code and return the payload of a successful envelope.
fn open_envelope(mut doc: Value, options: &DecodeOptions) -> Result<Value, ClientError> {
    let code = doc
        .field_i64(&options.code_field)
        .ok_or_else(|| ClientError::Envelope {
            code: None,
            message: format!(
                "envelope field `{}` is missing or not an integer",
                options.code_field
            ),
        })?;
    if code != ENVELOPE_OK {
        return Err(ClientError::Envelope {
            code: Some(code),
            message: doc
                .field_str(&options.message_field)
                .unwrap_or_default()
                .to_owned(),
        });
    }
    Ok(doc.take_field(&options.data_field).unwrap_or(Value::Null))
}

impl CallResult {
    /// The JSON payload selected by `options`.
    fn payload(&self, options: &DecodeOptions) -> Result<Value, ClientError> {
        if let Some(err) = self.error() {
            return Err(err.clone());
        }
        let status = self
            .status_code()
            .ok_or_else(|| ClientError::Protocol("response is nil".into()))?;
        let body = self.body();

        if status != StatusCode::OK {
            if body.is_empty() {
                return Err(ClientError::Protocol(format!(
                    "empty response body, status code: {}",
                    status.as_u16()
                )));
            }
            let message = if options.wrap_envelope {
                parse_json(body)?
                    .field_str(&options.message_field)
                    .unwrap_or_default()
                    .to_owned()
            } else {
                String::from_utf8_lossy(body).into_owned()
            };
            return Err(ClientError::Status { status, message });
        }

        let doc = parse_json(body)?;
        if options.wrap_envelope {
            open_envelope(doc, options)
        } else {
            Ok(doc)
        }
    }

    /// Decode the body into `dest`.
    ///
    /// `dest` is left untouched when any step fails. Unknown fields are
    /// ignored unless `T` opts into `deny_unknown_fields`.
    pub fn decode<T: DeserializeOwned>(
        &self,
        dest: &mut T,
        options: &DecodeOptions,
    ) -> Result<(), ClientError> {
        let payload = self.payload(options)?;
        *dest = serde_json::from_value(payload)?;
        Ok(())
    }

    /// Decode the body into a protobuf message.
    ///
    /// The message's serde implementation provides the JSON mapping. An
    /// `@type` key in the payload object is removed first.
    pub fn into_message<M>(&self, dest: &mut M, options: &DecodeOptions) -> Result<(), ClientError>
    where
        M: prost::Message + DeserializeOwned,
    {
        let mut payload = self.payload(options)?;
        payload.take_field(TYPE_URL_KEY);
        *dest = serde_json::from_value(payload)?;
        Ok(())
    }

    /// The serialized data field of a default-named envelope.
    ///
    /// The HTTP status is not consulted; only the business code is.
    pub fn unwrap_envelope(&self) -> Result<Bytes, ClientError> {
        if let Some(err) = self.error() {
            return Err(err.clone());
        }
        let data = open_envelope(parse_json(self.body())?, &DecodeOptions::envelope())?;
        Ok(Bytes::from(serde_json::to_vec(&data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Item {
        x: i64,
    }

    fn result(status: StatusCode, body: &'static str) -> CallResult {
        CallResult::new(status, HeaderMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn test_envelope_success() {
        let result = result(StatusCode::OK, r#"{"code":200,"message":"ok","data":{"x":1}}"#);
        let mut item = Item::default();
        result.decode(&mut item, &DecodeOptions::envelope()).unwrap();
        assert_eq!(item.x, 1);
    }

    #[test]
    fn test_envelope_business_failure_leaves_dest() {
        let result = result(StatusCode::OK, r#"{"code":400,"message":"bad input","data":{"x":1}}"#);
        let mut item = Item { x: 9 };
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(err.business_code(), Some(400));
        assert_eq!(item.x, 9);
    }

    #[test]
    fn test_envelope_missing_code() {
        let result = result(StatusCode::OK, r#"{"message":"ok","data":{"x":1}}"#);
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert!(matches!(err, ClientError::Envelope { code: None, .. }));
        assert!(err.to_string().contains("`code`"));
    }

    #[test]
    fn test_envelope_code_as_string_is_rejected() {
        let result = result(StatusCode::OK, r#"{"code":"200","data":{"x":1}}"#);
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert!(matches!(err, ClientError::Envelope { .. }));
    }

    #[test]
    fn test_envelope_custom_fields() {
        let result = result(StatusCode::OK, r#"{"errno":200,"msg":"ok","result":{"x":5}}"#);
        let options = DecodeOptions::envelope()
            .code_field("errno")
            .message_field("msg")
            .data_field("result");
        let mut item = Item::default();
        result.decode(&mut item, &options).unwrap();
        assert_eq!(item.x, 5);
    }

    #[test]
    fn test_envelope_missing_data_is_null() {
        let result = result(StatusCode::OK, r#"{"code":200,"message":"ok"}"#);
        let mut value: Option<Item> = Some(Item { x: 3 });
        result.decode(&mut value, &DecodeOptions::envelope()).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_raw_decode() {
        let result = result(StatusCode::OK, r#"{"x":7,"extra":true}"#);
        let mut item = Item::default();
        result.decode(&mut item, &DecodeOptions::raw()).unwrap();
        assert_eq!(item.x, 7);
    }

    #[test]
    fn test_malformed_json() {
        let result = result(StatusCode::OK, "not json");
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::raw()).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().contains("response body: not json"));
    }

    #[test]
    fn test_type_mismatch_is_decode_error() {
        let result = result(StatusCode::OK, r#"{"x":"one"}"#);
        let mut item = Item { x: 2 };
        let err = result.decode(&mut item, &DecodeOptions::raw()).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(item.x, 2);
    }

    #[test]
    fn test_non_200_empty_body() {
        let result = result(StatusCode::BAD_GATEWAY, "");
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert_eq!(err.to_string(), "empty response body, status code: 502");
    }

    #[test]
    fn test_non_200_with_envelope_uses_message() {
        let result = result(StatusCode::BAD_REQUEST, r#"{"code":400,"message":"bad input"}"#);
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_non_200_with_envelope_missing_message() {
        let result = result(StatusCode::NOT_FOUND, r#"{"code":404}"#);
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert_eq!(err.to_string(), "");
    }

    #[test]
    fn test_non_200_with_envelope_unparsable() {
        let result = result(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().contains("unmarshal json error"));
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[test]
    fn test_non_200_without_envelope_uses_body() {
        let result = result(StatusCode::FORBIDDEN, "forbidden");
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::raw()).unwrap_err();
        assert_eq!(err.to_string(), "forbidden");
    }

    #[test]
    fn test_stored_error_returned_unchanged() {
        let result = CallResult::from_error(ClientError::Transport("connection refused".into()));
        let mut item = Item::default();
        let err = result.decode(&mut item, &DecodeOptions::envelope()).unwrap_err();
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[derive(Clone, PartialEq, prost::Message, Deserialize)]
    struct Greeting {
        #[prost(string, tag = "1")]
        #[serde(default)]
        text: String,
    }

    #[test]
    fn test_into_message_strips_type_url() {
        let result = result(
            StatusCode::OK,
            r#"{"code":200,"data":{"@type":"type.googleapis.com/Greeting","text":"hi","unknown":1}}"#,
        );
        let mut greeting = Greeting::default();
        result
            .into_message(&mut greeting, &DecodeOptions::envelope())
            .unwrap();
        assert_eq!(greeting.text, "hi");
    }

    #[test]
    fn test_unwrap_envelope_ignores_http_status() {
        let result = result(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"code":200,"message":"ok","data":{"x":1}}"#,
        );
        assert_eq!(result.unwrap_envelope().unwrap(), Bytes::from_static(br#"{"x":1}"#));
    }

    #[test]
    fn test_unwrap_envelope_business_failure() {
        let result = result(StatusCode::OK, r#"{"code":500,"message":"boom"}"#);
        assert_eq!(result.unwrap_envelope().unwrap_err().to_string(), "boom");
    }
}
