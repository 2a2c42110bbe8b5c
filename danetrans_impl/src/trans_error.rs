use thiserror::Error;

/// A list specifying categories of [`TransError`](crate::TransError).
///
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransError {
    /// Error occured in communication with the peer.
    #[error(transparent)]
    Io {
        /// The causing Error.
        #[from]
        source: std::io::Error,
    },

    /// A frame or envelope could not be decoded.
    #[error(transparent)]
    Parse {
        /// The causing Error.
        #[from]
        source: ParseError,
    },

    /// A body could not be read from or written to JSON.
    #[error("Error occured in JSON (de)serialization")]
    Json {
        /// The causing Error.
        #[from]
        source: serde_json::Error,
    },

    /// The frame carried a checksum that does not match its body.
    #[error("Checksum mismatch: frame says {expected:#010x}, body hashes to {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum from the frame header.
        expected: u32,
        /// Checksum computed over the received body.
        computed: u32,
    },

    /// The mailbox is closed; the reactor is shutting down.
    #[error("Mailbox is closed")]
    MailboxClosed,

    /// Erroneous connect parameters, e.g. from a malformed connect URL.
    #[error("Erroneous connect parameters")]
    ConnParams {
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Implementation error.
    #[error("Implementation error: {}", _0)]
    Impl(&'static str),

    /// Implementation error.
    #[error("Implementation error: {}", _0)]
    ImplDetailed(String),

    /// Error occured in thread synchronization.
    #[error("Error occured in thread synchronization")]
    Poison,

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    Usage(&'static str),
}

/// Abbreviation of `Result<T, TransError>`.
pub type TransResult<T> = std::result::Result<T, TransError>;

impl TransError {
    /// Returns `true` if the outcome is not a defect but an expected interim state,
    /// like a non-blocking read that found the socket empty, or a pop from a mailbox
    /// that was closed for shutdown.
    ///
    /// Callers decide locally whether a branch is fatal in their context: `WouldBlock`
    /// on a non-blocking socket ends the drain loop, while the same outcome on a
    /// blocking connect attempt is a real error.
    pub fn is_branch(&self) -> bool {
        match self {
            Self::Io { source } => matches!(
                source.kind(),
                std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
            ),
            Self::MailboxClosed => true,
            _ => false,
        }
    }

    /// Returns `true` if the outcome is unrecoverable at this layer.
    pub fn is_fatal(&self) -> bool {
        !self.is_branch()
    }

    /// Reveal the inner error.
    pub fn inner(&self) -> Option<&dyn std::error::Error> {
        match self {
            Self::Io { source } => Some(source),
            Self::Parse { source } => Some(source),
            Self::Json { source } => Some(source),
            Self::ConnParams { source } => Some(&**source),
            _ => None,
        }
    }

    pub(crate) fn conn_params(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self::ConnParams { source: error }
    }
}

impl<G> From<std::sync::PoisonError<G>> for TransError {
    fn from(_error: std::sync::PoisonError<G>) -> Self {
        Self::Poison
    }
}

/// Reason why a byte sequence could not be decoded.
///
/// Distinguishing the reason matters to the reactor: a `Short` or `Truncated`
/// input just means more bytes have to arrive, while `BadMagic` and `OverLength`
/// discredit the stream itself.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Fewer bytes than the fixed minimum of the structure.
    #[error("Input is shorter than the minimal encoded size")]
    Short,

    /// The magic number does not identify this protocol.
    #[error("Bad magic number {found:#010x}")]
    BadMagic {
        /// The four bytes found where the magic number was expected.
        found: u32,
    },

    /// A declared length exceeds the configured maximum.
    #[error("Declared length {length} exceeds the configured maximum {max}")]
    OverLength {
        /// Length declared on the wire.
        length: u64,
        /// Configured maximum.
        max: u64,
    },

    /// A discriminant on the wire maps to no known enum value.
    #[error("Value {value} is not valid for {what}")]
    BadEnum {
        /// Name of the decoded type.
        what: &'static str,
        /// The offending discriminant.
        value: u32,
    },

    /// The input ended in the middle of a field.
    #[error("Input ends in the middle of a field")]
    Truncated,

    /// A string field does not hold valid UTF-8.
    #[error("String field holds invalid UTF-8")]
    BadUtf8,
}

#[macro_export]
macro_rules! impl_err {
    ($s:literal) => {
        $crate::TransError::Impl($s)
    };
    ($($arg:tt)*) => {
        $crate::TransError::ImplDetailed(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! usage_err {
    ($s:literal) => {
        $crate::TransError::Usage($s)
    };
}
