// docu is written at the re-export of the frontend crate (danetrans/lib.rs)
#[derive(Debug, Clone)]
pub struct SerializeConfig {
    max_message_length: u32,
    max_name_length: u16,
    checksum_on_send: bool,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            max_message_length: Self::DEFAULT_MAX_MESSAGE_LENGTH,
            max_name_length: Self::DEFAULT_MAX_NAME_LENGTH,
            checksum_on_send: Self::DEFAULT_CHECKSUM_ON_SEND,
        }
    }
}
impl SerializeConfig {
    /// Default value for the maximum number of bytes a single message body may declare.
    ///
    /// A frame whose header declares more is rejected before any body allocation happens.
    pub const DEFAULT_MAX_MESSAGE_LENGTH: u32 = 40 * 1024 * 1024;

    /// Default value for the maximum byte length of a name-like string field
    /// (envelope path, file name).
    pub const DEFAULT_MAX_NAME_LENGTH: u16 = 128;

    /// By default outgoing frames do not carry a checksum.
    pub const DEFAULT_CHECKSUM_ON_SEND: bool = false;

    /// Returns the maximum accepted message body length.
    pub fn max_message_length(&self) -> u32 {
        self.max_message_length
    }
    /// Sets the maximum accepted message body length.
    pub fn set_max_message_length(&mut self, max: u32) {
        self.max_message_length = max;
    }
    /// Builder-method for setting the maximum accepted message body length.
    #[must_use]
    pub fn with_max_message_length(mut self, max: u32) -> Self {
        self.max_message_length = max;
        self
    }

    /// Returns the maximum accepted length of name-like string fields.
    pub fn max_name_length(&self) -> u16 {
        self.max_name_length
    }
    /// Sets the maximum accepted length of name-like string fields.
    pub fn set_max_name_length(&mut self, max: u16) {
        self.max_name_length = max;
    }
    /// Builder-method for setting the maximum accepted length of name-like string fields.
    #[must_use]
    pub fn with_max_name_length(mut self, max: u16) -> Self {
        self.max_name_length = max;
        self
    }

    /// Returns whether outgoing frames carry a CRC32 checksum over the body.
    pub fn is_checksum_on_send(&self) -> bool {
        self.checksum_on_send
    }
    /// Defines whether outgoing frames carry a CRC32 checksum over the body.
    pub fn set_checksum_on_send(&mut self, cs: bool) {
        self.checksum_on_send = cs;
    }
    /// Builder-method for defining whether outgoing frames carry a CRC32 checksum.
    #[must_use]
    pub fn with_checksum_on_send(mut self, cs: bool) -> Self {
        self.checksum_on_send = cs;
        self
    }
}
