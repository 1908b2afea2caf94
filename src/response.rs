use embedded_io_async::Write;

use crate::ascii::{AsciiInt, CR, LF, SP};
use crate::{HttpWrite, WriteError};

const HTTP_PROTO: &str = "HTTP/1.1";

/// ResponseError is returned when responding to clients.  Generally handlers will not inspect
/// this error, but pass it on with `?`.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// The transport did not accept every byte of the response
    NetworkError,
}

impl From<WriteError> for ResponseError {
    fn from(value: WriteError) -> Self {
        match value {
            WriteError::NetworkError => Self::NetworkError,
        }
    }
}

/// HTTP status code returned in a response
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    /// 200 Ok
    OK,
    /// 204 No Content
    NoContent,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Found
    Found,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Server Error
    InternalServerError,
    /// 503 Service Unavailable
    ServiceUnavailable,
    /// Any other code, with its reason phrase
    Other(u16, &'static str),
}

impl StatusCode {
    /// Numeric status code
    pub fn code(&self) -> u16 {
        match self {
            Self::OK => 200,
            Self::NoContent => 204,
            Self::MovedPermanently => 301,
            Self::Found => 302,
            Self::NotModified => 304,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
            Self::Other(n, _) => *n,
        }
    }

    /// Reason phrase sent after the code
    pub fn reason(&self) -> &'static str {
        match self {
            Self::OK => "OK",
            Self::NoContent => "No Content",
            Self::MovedPermanently => "Moved Permanently",
            Self::Found => "Found",
            Self::NotModified => "Not Modified",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::Other(_, reason) => reason,
        }
    }
}

impl HttpWrite for StatusCode {
    #[rustfmt::skip]
    async fn write<T: Write>(self, writer: &mut T) -> Result<(), WriteError> {
        let code = AsciiInt::from(self.code());

        writer.write_all(HTTP_PROTO.as_bytes()).await
            .and(writer.write_all(&[SP]).await
            .and(writer.write_all(code.as_str().as_bytes()).await
            .and(writer.write_all(&[SP]).await
            .and(writer.write_all(self.reason().as_bytes()).await
            .and(writer.write_all(&[CR, LF]).await
        ))))).or(Err(WriteError::NetworkError))
    }
}
