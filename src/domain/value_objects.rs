use base64::prelude::*;
use url::form_urlencoded;

/// Target URL, always scheme-qualified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub String);

impl Url {
    /// Creates a new Url, prepending `http://` when no scheme is given
    ///
    /// # Arguments
    /// * `url` - The URL as typed on the command line
    pub fn new(url: &str) -> Self {
        if url.starts_with("http://") || url.starts_with("https://") {
            Url(url.to_string())
        } else {
            Url(format!("http://{}", url))
        }
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordered, multi-valued `key=value` pairs taken from positional arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(pub Vec<(String, String)>);

impl FormParams {
    /// Collects every token of the form `key=value`, splitting on the first `=`.
    /// Tokens with no `=`, or with an empty key, are skipped.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let pairs = tokens
            .iter()
            .filter_map(|token| match token.as_ref().split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    Some((key.to_string(), value.to_string()))
                }
                _ => None,
            })
            .collect();
        FormParams(pairs)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` serialization, in insertion order
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Extra request headers from the `-header` flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraHeaders(pub Vec<(String, String)>);

impl ExtraHeaders {
    /// Parses `Name:Value,Name:Value`. Fields without a name before the
    /// first `:` are dropped.
    pub fn parse(raw: &str) -> Self {
        let headers = raw
            .split(',')
            .filter_map(|field| match field.split_once(':') {
                Some((name, value)) if !name.is_empty() => {
                    Some((name.trim().to_string(), value.trim().to_string()))
                }
                _ => None,
            })
            .collect();
        ExtraHeaders(headers)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Credentials for HTTP basic authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub pass: String,
}

impl BasicAuth {
    /// Parses `user:pass`. Returns `None` when there is no user before the
    /// first `:`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.split_once(':') {
            Some((user, pass)) if !user.is_empty() => Some(BasicAuth {
                user: user.to_string(),
                pass: pass.to_string(),
            }),
            _ => None,
        }
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.user, self.pass);
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }
}
