//! Broker-agnostic message envelope.

/// A message header. Values are raw bytes, as brokers carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: Vec<u8>,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An inbound or outbound message: optional key, opaque payload, headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub key: Option<Vec<u8>>,
    pub value: Vec<u8>,
    pub headers: Vec<Header>,
}

impl Message {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    /// Returns the value of the last header named `key`.
    pub fn header(&self, key: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .rev()
            .find(|h| h.key == key)
            .map(|h| h.value.as_slice())
    }

    /// Header value as UTF-8 text, if it is valid UTF-8.
    pub fn header_str(&self, key: &str) -> Option<&str> {
        self.header(key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Key as UTF-8 text, lossily; used for logging.
    pub fn key_lossy(&self) -> String {
        self.key
            .as_deref()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_key_and_headers() {
        let msg = Message::new(b"{}".to_vec())
            .with_key("b1")
            .with_header("trace-id", "abc");

        assert_eq!(msg.key.as_deref(), Some(&b"b1"[..]));
        assert_eq!(msg.header_str("trace-id"), Some("abc"));
        assert_eq!(msg.key_lossy(), "b1");
    }

    #[test]
    fn test_header_returns_last_occurrence() {
        let msg = Message::new(Vec::new())
            .with_header("error", "first")
            .with_header("error", "second");

        assert_eq!(msg.header_str("error"), Some("second"));
        assert!(msg.header("missing").is_none());
    }

    #[test]
    fn test_key_lossy_without_key_is_empty() {
        assert_eq!(Message::new(Vec::new()).key_lossy(), "");
    }
}
