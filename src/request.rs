const GET: &[u8] = "GET".as_bytes();
const POST: &[u8] = "POST".as_bytes();
const PUT: &[u8] = "PUT".as_bytes();
const PATCH: &[u8] = "PATCH".as_bytes();
const DELETE: &[u8] = "DELETE".as_bytes();
const OPTIONS: &[u8] = "OPTIONS".as_bytes();
const HEAD: &[u8] = "HEAD".as_bytes();

#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum RequestError {
    ProtocolError(&'static str),
}

/// Method such as GET. POST, DELETE etc.
#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    #[allow(missing_docs)]
    GET,
    #[allow(missing_docs)]
    POST,
    #[allow(missing_docs)]
    PUT,
    #[allow(missing_docs)]
    PATCH,
    #[allow(missing_docs)]
    DELETE,
    #[allow(missing_docs)]
    OPTIONS,
    #[allow(missing_docs)]
    HEAD,
}

impl TryFrom<&[u8]> for Method {
    type Error = &'static str;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            GET => Ok(Self::GET),
            POST => Ok(Self::POST),
            PUT => Ok(Self::PUT),
            PATCH => Ok(Self::PATCH),
            DELETE => Ok(Self::DELETE),
            OPTIONS => Ok(Self::OPTIONS),
            HEAD => Ok(Self::HEAD),
            _ => Err("unknown http method"),
        }
    }
}

/// The first line of a request, e.g. `GET /index.html?foo=bar HTTP/1.1`
#[derive(Debug, PartialEq)]
pub(crate) struct RequestLine<'a> {
    /// method token as sent, which may not be a known `Method`
    pub(crate) method: &'a str,
    /// path without the query string
    pub(crate) path: &'a str,
    /// everything after the first `?` of the target
    pub(crate) query: Option<&'a str>,
    pub(crate) version: &'a str,
}

impl<'a> RequestLine<'a> {
    /// Split a request line into its whitespace separated method, target and version.
    pub(crate) fn parse(line: &'a [u8]) -> Result<Self, RequestError> {
        let line = core::str::from_utf8(line)
            .or(Err(RequestError::ProtocolError("request line is not valid utf8")))?;

        let mut words = line.split_ascii_whitespace();
        let (Some(method), Some(target), Some(version)) = (words.next(), words.next(), words.next())
        else {
            return Err(RequestError::ProtocolError("malformed request line"));
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        Ok(RequestLine {
            method,
            path,
            query,
            version,
        })
    }

    pub(crate) fn method(&self) -> Option<Method> {
        Method::try_from(self.method.as_bytes()).ok()
    }
}
