use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PersistenceError;

/// JSON encoding settings.
#[derive(Debug, Clone, Default)]
pub struct JsonFormat {
    /// Whether to pretty-print with indentation.
    pub pretty: bool,
}

impl JsonFormat {
    /// Creates a new `JsonFormat` with default settings (compact).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `JsonFormat` with pretty-printing enabled.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Encodes a document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if encoding fails.
    pub fn encode<T: Serialize>(&self, document: &T) -> Result<Vec<u8>, PersistenceError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        Ok(bytes)
    }

    /// Decodes a document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if the bytes are not a valid document.
    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PersistenceError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::{VertexDocument, VertexRecord};

    fn sample() -> VertexDocument {
        VertexDocument {
            vertices: vec![VertexRecord {
                id: 0,
                x: 1.0,
                y: 2.0,
            }],
        }
    }

    #[test]
    fn pretty_output_is_larger() {
        let compact = JsonFormat::new().encode(&sample()).unwrap();
        let pretty = JsonFormat::pretty().encode(&sample()).unwrap();
        assert!(pretty.len() > compact.len());

        let a: VertexDocument = JsonFormat::decode(&compact).unwrap();
        let b: VertexDocument = JsonFormat::decode(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_is_rejected() {
        let result = JsonFormat::decode::<VertexDocument>(b"{not json");
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }
}
