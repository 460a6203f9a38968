use crate::domain::entities::{OutputMode, Response};
use anyhow::Result;
use futures::TryStreamExt;
use hyper::HeaderMap;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub const HEADERS_BANNER: &str =
    "---------------------------------- Headers ------------------------------------------";
pub const BODY_BANNER: &str =
    "----------------------------------- Body --------------------------------------------";

const HEADER_NAME_WIDTH: usize = 20;

/// Writes the response to `out` according to `mode`.
///
/// Takes ownership of the response so the body is released on every path,
/// including write failures and header-only output.
pub async fn print_response<W>(out: &mut W, response: Response, mode: OutputMode) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if mode.shows_headers() {
        let mut head = format!("{}\n{}\n", HEADERS_BANNER, response.status_line());
        head.push_str(&format_headers(&response.headers));
        out.write_all(head.as_bytes()).await?;
    }

    if mode == OutputMode::Full {
        out.write_all(format!("{}\n", BODY_BANNER).as_bytes()).await?;
    }

    if mode.shows_body() {
        let mut body = response.body;
        while let Some(chunk) = body.try_next().await? {
            out.write_all(&chunk).await?;
        }
    }

    out.flush().await?;
    Ok(())
}

/// One `Name\tValue` line per header name; repeated headers are shown as
/// `[v1 v2]`
fn format_headers(headers: &HeaderMap) -> String {
    let mut lines = String::new();
    for name in headers.keys() {
        let values: Vec<_> = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        let value = match values.as_slice() {
            [single] => single.clone(),
            many => format!("[{}]", many.join(" ")),
        };
        lines.push_str(&format!(
            "{:<width$}\t{}\n",
            canonical_name(name.as_str()),
            value,
            width = HEADER_NAME_WIDTH
        ));
    }
    lines
}

/// `content-type` -> `Content-Type`
fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            canonical.push(c.to_ascii_uppercase());
        } else {
            canonical.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    canonical
}
