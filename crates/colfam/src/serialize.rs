use crate::value::{FieldKind, Value};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("decoded value kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: FieldKind,
        found: FieldKind,
    },
}

///
/// Codec
///
/// Injected value codec: converts tagged [`Value`]s to storage bytes and
/// back. Decoding dispatches on the declared attribute kind; the codec must
/// reject bytes whose tag does not match.
///

pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializeError>;
    fn decode(&self, bytes: &[u8], kind: FieldKind) -> Result<Value, SerializeError>;
}

///
/// CborCodec
///
/// Default codec. CBOR keeps the value tag in-band, so round-trips are
/// self-describing and the kind check is a pure tag comparison.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CborCodec;

impl Codec for CborCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializeError> {
        serde_cbor::to_vec(value).map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    fn decode(&self, bytes: &[u8], kind: FieldKind) -> Result<Value, SerializeError> {
        let value: Value =
            serde_cbor::from_slice(bytes).map_err(|e| SerializeError::Deserialize(e.to_string()))?;

        if value.kind() == kind {
            Ok(value)
        } else {
            Err(SerializeError::KindMismatch {
                expected: kind,
                found: value.kind(),
            })
        }
    }
}
