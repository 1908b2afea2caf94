use embedded_io_async::Write;

use crate::ascii::{AsciiInt, CR, LF};
use crate::{HttpWrite, WriteError};

/// Host
pub const REQ_HEAD_HOST: &str = "Host";
/// User-Agent
pub const REQ_HEAD_USER_AGENT: &str = "User-Agent";
/// Accept
pub const REQ_HEAD_ACCEPT: &str = "Accept";
/// Accept-Encoding
pub const REQ_HEAD_ACCEPT_ENCODING: &str = "Accept-Encoding";
/// Connection
pub const REQ_HEAD_CONNECTION: &str = "Connection";
/// If-None-Match
pub const REQ_HEAD_IF_NONE_MATCH: &str = "If-None-Match";
/// Cache-Control
pub const REQ_HEAD_CACHE_CONTROL: &str = "Cache-Control";

/// A request header as read from the client, one line at a time.
///
/// The name is everything before the first colon.  A single space following the colon is
/// not part of the value.  A line without a colon yields a header without a value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Header<'a> {
    /// Header name, as sent
    pub name: &'a str,
    /// Header value, `None` when the line had no colon
    pub value: Option<&'a str>,
}

impl<'a> Header<'a> {
    pub(crate) fn parse(line: &'a str) -> Self {
        match line.split_once(':') {
            Some((name, value)) => Header {
                name,
                value: Some(value.strip_prefix(' ').unwrap_or(value)),
            },
            None => Header {
                name: line,
                value: None,
            },
        }
    }

    /// Case insensitive comparison of the header name
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Access-Control-Allow-Origin
pub const RESP_HEAD_ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// Cache-Control
pub const RESP_HEAD_CACHE_CONTROL: &str = "Cache-Control";
/// Connection
pub const RESP_HEAD_CONNECTION: &str = "Connection";
/// Content-Length
pub const RESP_HEAD_CONTENT_LENGTH: &str = "Content-Length";
/// Content-Type
pub const RESP_HEAD_CONTENT_TYPE: &str = "Content-Type";
/// Location
pub const RESP_HEAD_LOCATION: &str = "Location";
/// Refresh
pub const RESP_HEAD_REFRESH: &str = "Refresh";
/// Server
pub const RESP_HEAD_SERVER: &str = "Server";

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResponseHeader<'a> {
    AccessControlAllowOrigin(&'a str),
    CacheControl(&'a str),
    Connection(&'a str),
    ContentLength(usize),
    ContentType(&'a str),
    Location(&'a str),
    Refresh(&'a str),
    Server(&'a str),
    Other(&'a str, &'a str),
}

impl HttpWrite for ResponseHeader<'_> {
    async fn write<T: Write>(self, writer: &mut T) -> Result<(), WriteError> {
        let len: AsciiInt;

        let (name, value) = match self {
            Self::AccessControlAllowOrigin(s) => (RESP_HEAD_ACCESS_CONTROL_ALLOW_ORIGIN, s),
            Self::CacheControl(s) => (RESP_HEAD_CACHE_CONTROL, s),
            Self::Connection(s) => (RESP_HEAD_CONNECTION, s),
            Self::ContentLength(n) => {
                len = AsciiInt::from(n);
                (RESP_HEAD_CONTENT_LENGTH, len.as_str())
            }
            Self::ContentType(s) => (RESP_HEAD_CONTENT_TYPE, s),
            Self::Location(s) => (RESP_HEAD_LOCATION, s),
            Self::Refresh(s) => (RESP_HEAD_REFRESH, s),
            Self::Server(s) => (RESP_HEAD_SERVER, s),
            Self::Other(k, v) => (k, v),
        };

        let parts: [&[u8]; 4] = [name.as_bytes(), b": ", value.as_bytes(), &[CR, LF]];
        for part in parts {
            writer
                .write_all(part)
                .await
                .or(Err(WriteError::NetworkError))?;
        }

        Ok(())
    }
}
