/// Scheme of a parsed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlScheme {
    Http,
    Https,
    Ftp,
    /// The transfer protocol of this crate.
    Danejoe,
    Unknown,
}

impl UrlScheme {
    pub fn from_scheme_str(scheme: &str) -> Self {
        match scheme {
            "http" => Self::Http,
            "https" => Self::Https,
            "ftp" => Self::Ftp,
            "danejoe" => Self::Danejoe,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Ftp => "ftp",
            Self::Danejoe => "danejoe",
            Self::Unknown => "unknown",
        }
    }

    /// The port assumed when the URL does not name one; 0 for unknown schemes.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
            Self::Ftp => 21,
            Self::Danejoe => 8080,
            Self::Unknown => 0,
        }
    }
}

/// The parts of a `scheme://host[:port]/path?query` URL.
///
/// Duplicate query keys are preserved in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInfo {
    pub scheme: UrlScheme,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl UrlInfo {
    /// Returns one value of the given query key, if any is present.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `host:port` pair in the form the socket layer wants.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for UrlInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "scheme={} | host={} | port={} | path={} | query_count={}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path,
            self.query.len()
        )
    }
}
