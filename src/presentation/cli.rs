use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::HttpRequestService;
use crate::domain::entities::{OutputMode, RequestSpec};
use crate::infrastructure::output::print_response;
use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Long flags that may be written with a single dash, as in `-body`
const LONG_FLAGS: &[&str] = &["body", "head", "basic", "header"];
/// Long flags that take a value
const VALUE_FLAGS: &[&str] = &["basic", "header"];
/// Long spellings of the short flags
const SHORT_ALIASES: &[(&str, &str)] = &[("h", "-h"), ("help", "-h"), ("v", "-v")];

/// CLI configuration for gurl
#[derive(Parser, Debug)]
#[command(
    name = "gurl",
    about = "gurl: a command-line tool like curl, but very simple",
    long_about = None,
    override_usage = "gurl [options] <method> <url> [key=value ...]",
    after_help = "Examples:\n  gurl get www.google.com\n  echo hello | gurl post http://httpbin.org/post\n  gurl post http://httpbin.org/post id=123 \"name=jack bower\"",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// print help
    #[arg(short = 'h')]
    pub help: bool,

    /// print version
    #[arg(short = 'v')]
    pub version: bool,

    /// print only body
    #[arg(
        long = "body",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub body_only: bool,

    /// print only headers
    #[arg(
        long = "head",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub headers_only: bool,

    /// basic auth credentials
    #[arg(long = "basic", value_name = "user:pass", allow_hyphen_values = true)]
    pub basic: Option<String>,

    /// extra request headers
    #[arg(
        long = "header",
        value_name = "Content-Type:text/json,Foo:bar",
        allow_hyphen_values = true
    )]
    pub header: Option<String>,

    /// [method] <url> [key=value ...]
    #[arg(trailing_var_arg = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// What a single run of the tool should do
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Usage,
    Version,
    Execute(RequestSpec),
}

impl Cli {
    /// Parses process arguments, exiting with clap's message on bad syntax
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_args(args).unwrap_or_else(|err| err.exit())
    }

    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_flags(args))
    }

    pub fn invocation(&self, stdin_piped: bool) -> Invocation {
        if self.help {
            return Invocation::Usage;
        }
        if self.version {
            return Invocation::Version;
        }

        match RequestBuilder::positionals(&self.args) {
            Some(builder) => Invocation::Execute(
                builder
                    .headers(self.header.as_deref().unwrap_or_default())
                    .basic_auth(self.basic.as_deref().unwrap_or_default())
                    .stdin_piped(stdin_piped)
                    .output(OutputMode::from_flags(self.headers_only, self.body_only))
                    .build(),
            ),
            None => Invocation::Usage,
        }
    }

    /// `connect` is only called when a request is actually made, so usage
    /// and version never touch the network stack.
    pub async fn run<F, W>(&self, connect: F, stdin_piped: bool, out: &mut W) -> Result<()>
    where
        F: FnOnce() -> Result<HttpRequestService>,
        W: AsyncWrite + Unpin,
    {
        match self.invocation(stdin_piped) {
            Invocation::Usage => {
                eprint!("{}", Self::usage());
                Ok(())
            }
            Invocation::Version => {
                out.write_all(format!("{}\n", version_line()).as_bytes())
                    .await?;
                out.flush().await?;
                Ok(())
            }
            Invocation::Execute(request) => {
                let request_service = connect()?;
                let response = request_service.send_request(&request).await?;
                print_response(out, response, request.output).await
            }
        }
    }

    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

pub fn version_line() -> String {
    format!("gurl version {}", env!("CARGO_PKG_VERSION"))
}

/// Rewrites single-dash long flags (`-body`, `-basic=x`) to clap's `--`
/// form and `--h`/`--v` to their short form. Rewriting stops at the first positional argument or `--`; a
/// value-taking flag given as `-basic user:pass` carries its value along.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let text = match arg.to_str() {
            Some(text) => text.to_owned(),
            None => {
                normalized.push(arg);
                break;
            }
        };
        if text == "--" || text == "-" || !text.starts_with('-') {
            normalized.push(arg);
            break;
        }

        let flag = text.trim_start_matches('-');
        if let Some((_, short)) = SHORT_ALIASES.iter().find(|(long, _)| *long == flag) {
            normalized.push(OsString::from(*short));
            continue;
        }
        let (name, inline_value) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };
        if !LONG_FLAGS.contains(&name) {
            normalized.push(arg);
            continue;
        }

        let takes_value = VALUE_FLAGS.contains(&name) && !inline_value;
        normalized.push(format!("--{}", flag).into());
        if takes_value {
            normalized.extend(args.next());
        }
    }

    normalized.extend(args);
    normalized
}
