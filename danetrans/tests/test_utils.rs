// advisable because not all test modules use all functions of this module:
#![allow(dead_code)]

use danetrans::{ReactorConfiguration, SerializeConfig, TransResult, TransServer, TransService};
use flexi_logger::{opt_format, Logger, LoggerHandle};

// Returns a logger that prints out all info, warn and error messages.
pub fn init_logger() -> LoggerHandle {
    Logger::try_with_env_or_str("info")
        .unwrap()
        .format(opt_format)
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"))
}

// A loopback server with default wiring, bound to an ephemeral port.
pub fn start_echo_server(config: ReactorConfiguration) -> TransResult<TransServer> {
    let service = TransService::new(config.serialize().clone());
    TransServer::start("127.0.0.1:0".parse().unwrap(), service, config)
}

pub fn server_url(server: &TransServer) -> String {
    format!("danejoe://127.0.0.1:{}", server.local_addr().port())
}

pub fn default_serialize_config() -> SerializeConfig {
    SerializeConfig::default()
}
