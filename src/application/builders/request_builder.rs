use crate::domain::entities::{BodySource, Method, OutputMode, RequestSpec};
use crate::domain::value_objects::{BasicAuth, ExtraHeaders, FormParams, Url};

/// Folds command-line input into a `RequestSpec`.
///
/// Nothing here fails: malformed tokens are dropped. The only way to not get
/// a spec is to not supply a URL, which `positionals` reports by returning
/// `None`.
pub struct RequestBuilder {
    method: Method,
    url: Url,
    form_params: FormParams,
    headers: ExtraHeaders,
    basic_auth: Option<BasicAuth>,
    stdin_piped: bool,
    output: OutputMode,
}

impl RequestBuilder {
    /// Interprets `[method] <url> [key=value ...]`.
    ///
    /// The first token is consumed as the method only when it names one;
    /// otherwise the method is GET and the token is the URL.
    pub fn positionals<S: AsRef<str>>(args: &[S]) -> Option<Self> {
        let (first, rest) = args.split_first()?;
        let (method, rest) = match first.as_ref().parse::<Method>() {
            Ok(method) => (method, rest),
            Err(_) => (Method::Get, args),
        };
        let (url, params) = rest.split_first()?;

        Some(Self {
            method,
            url: Url::new(url.as_ref()),
            form_params: FormParams::parse(params),
            headers: ExtraHeaders::default(),
            basic_auth: None,
            stdin_piped: false,
            output: OutputMode::default(),
        })
    }

    pub fn headers(mut self, raw_headers: &str) -> Self {
        self.headers = ExtraHeaders::parse(raw_headers);
        self
    }

    pub fn basic_auth(mut self, raw_credentials: &str) -> Self {
        self.basic_auth = BasicAuth::parse(raw_credentials);
        self
    }

    /// Whether standard input is redirected and may serve as the body
    pub fn stdin_piped(mut self, piped: bool) -> Self {
        self.stdin_piped = piped;
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn build(self) -> RequestSpec {
        let body = if !self.form_params.is_empty() {
            BodySource::Form(self.form_params.encode())
        } else if self.stdin_piped {
            BodySource::Stdin
        } else {
            BodySource::Empty
        };

        RequestSpec {
            method: self.method,
            url: self.url,
            form_params: self.form_params,
            headers: self.headers,
            basic_auth: self.basic_auth,
            body,
            output: self.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(args: &[&str]) -> RequestSpec {
        RequestBuilder::positionals(args).unwrap().build()
    }

    #[test]
    fn recognised_method_is_consumed() {
        for (raw, method) in [
            ("get", Method::Get),
            ("POST", Method::Post),
            ("head", Method::Head),
            ("Put", Method::Put),
            ("delete", Method::Delete),
            ("OPTIONS", Method::Options),
        ] {
            let spec = spec(&[raw, "example.com"]);
            assert_eq!(spec.method, method);
            assert_eq!(spec.url.as_str(), "http://example.com");
        }
    }

    #[test]
    fn unrecognised_first_token_is_the_url() {
        let spec = spec(&["www.example.com", "a=1"]);
        assert_eq!(spec.method, Method::Get);
        assert_eq!(spec.url.as_str(), "http://www.example.com");
        assert_eq!(spec.body, BodySource::Form("a=1".to_string()));
    }

    #[test]
    fn missing_url_yields_nothing() {
        assert!(RequestBuilder::positionals::<&str>(&[]).is_none());
        assert!(RequestBuilder::positionals(&["get"]).is_none());
    }

    #[test]
    fn form_params_become_the_body() {
        let spec = spec(&["post", "http://httpbin.org/post", "id=123", "name=jack bower"]);
        assert_eq!(spec.method, Method::Post);
        assert_eq!(spec.url.as_str(), "http://httpbin.org/post");
        assert_eq!(spec.body, BodySource::Form("id=123&name=jack+bower".to_string()));
    }

    #[test]
    fn tokens_without_equals_contribute_nothing() {
        let spec = spec(&["post", "example.com", "foo"]);
        assert!(spec.form_params.is_empty());
        assert_eq!(spec.body, BodySource::Empty);
    }

    #[test]
    fn piped_stdin_is_used_only_without_form_params() {
        let piped = RequestBuilder::positionals(&["post", "example.com"])
            .unwrap()
            .stdin_piped(true)
            .build();
        assert_eq!(piped.body, BodySource::Stdin);

        let form = RequestBuilder::positionals(&["post", "example.com", "a=b"])
            .unwrap()
            .stdin_piped(true)
            .build();
        assert_eq!(form.body, BodySource::Form("a=b".to_string()));
    }

    #[test]
    fn headers_and_credentials_are_attached() {
        let spec = RequestBuilder::positionals(&["example.com"])
            .unwrap()
            .headers("Content-Type:text/json,Foo:bar")
            .basic_auth("user:pass")
            .output(OutputMode::HeadersOnly)
            .build();
        assert_eq!(
            spec.headers.iter().collect::<Vec<_>>(),
            vec![("Content-Type", "text/json"), ("Foo", "bar")]
        );
        assert_eq!(spec.basic_auth.unwrap().user, "user");
        assert_eq!(spec.output, OutputMode::HeadersOnly);
    }

    #[test]
    fn malformed_credentials_are_ignored() {
        let spec = RequestBuilder::positionals(&["example.com"])
            .unwrap()
            .basic_auth("invalidnocolon")
            .build();
        assert!(spec.basic_auth.is_none());
    }
}
