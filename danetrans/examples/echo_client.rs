use danetrans::{ReactorConfiguration, TransClient, TransResult};
use flexi_logger::Logger;

// Sends one /test request to the echo server and prints the response.
fn main() -> TransResult<()> {
    Logger::try_with_env_or_str("info")
        .unwrap()
        .start()
        .unwrap();

    let client = TransClient::connect("danejoe://127.0.0.1:8080", ReactorConfiguration::default())?;
    let request_id = client.send_test_request("hello over the wire")?;
    let response = client.recv_response()?;
    log::info!("response to {request_id}: {response}");
    let test = client.codec().try_parse_test_response(&response.body)?;
    log::info!("echoed message: {}", test.message);
    client.stop()
}
