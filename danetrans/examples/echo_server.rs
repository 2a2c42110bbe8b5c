use danetrans::{ReactorConfiguration, TransResult, TransServer, TransService};
use flexi_logger::Logger;

// Serves the built-in /test echo on 127.0.0.1:8080 until ctrl-c.
fn main() -> TransResult<()> {
    Logger::try_with_env_or_str("info")
        .unwrap()
        .start()
        .unwrap();

    let config = ReactorConfiguration::default();
    let service = TransService::new(config.serialize().clone());
    let server = TransServer::start("127.0.0.1:8080".parse().unwrap(), service, config)?;
    log::info!("echo server on {}", server.local_addr());

    loop {
        std::thread::park();
    }
}
