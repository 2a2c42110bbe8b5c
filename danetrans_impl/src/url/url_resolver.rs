use super::{UrlInfo, UrlScheme};
use crate::{TransError, TransResult};
use ::url::Url;

/// Parses and builds the URL form used by the client wiring.
#[derive(Debug)]
pub struct UrlResolver;

impl UrlResolver {
    /// Parses `scheme://host[:port]/path[?k=v[&k=v…]]`.
    ///
    /// An unknown scheme parses to [`UrlScheme::Unknown`] with default port 0.
    pub fn parse(input: &str) -> TransResult<UrlInfo> {
        let parsed = Url::parse(input).map_err(|e| TransError::conn_params(Box::new(e)))?;
        let scheme = UrlScheme::from_scheme_str(parsed.scheme());
        let host = parsed.host_str().unwrap_or_default().to_string();
        let port = parsed.port().unwrap_or_else(|| scheme.default_port());
        let path = parsed.path().to_string();
        let query = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Ok(UrlInfo {
            scheme,
            host,
            port,
            path,
            query,
        })
    }

    /// Builds the URL string back from its parts; the inverse of
    /// [`parse`](Self::parse).
    pub fn build(info: &UrlInfo) -> String {
        use std::fmt::Write;

        let mut url = format!(
            "{}://{}:{}{}",
            info.scheme.as_str(),
            info.host,
            info.port,
            info.path
        );
        let mut sep = std::iter::repeat(())
            .enumerate()
            .map(|(i, _)| if i == 0 { "?" } else { "&" });
        for (k, v) in &info.query {
            let _ = write!(url, "{}{k}={v}", sep.next().unwrap());
        }
        url
    }
}
