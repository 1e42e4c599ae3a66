use std::net::SocketAddr;

use config_file::FromConfigFile;
use serde::Deserialize;
use tokio::{io::AsyncWriteExt, net::TcpStream};

pub mod recv_until;

use std::io::Error as StdError;

// the board terminates its reply with this rule
const END_MARKER: &[u8] = b"=====================";

#[derive(Debug)]
enum Error {
    Timeout(u64),
    Refused(SocketAddr),
    IO(StdError),
}

impl From<StdError> for Error {
    fn from(value: StdError) -> Self {
        Error::IO(value)
    }
}

#[derive(Deserialize)]
struct Config {
    server: String,
    timeout: u64,
    message: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: "192.168.1.100:7".into(),
            timeout: 5,
            message: "Hello, Server!".into(),
        }
    }
}

async fn send_and_receive(
    server: SocketAddr,
    message: &str,
    timeout: u64,
) -> Result<Vec<u8>, Error> {
    println!("Connecting to {server}...");
    let mut stream = tokio::select! {
        _ = tokio::time::sleep(std::time::Duration::from_secs(timeout)) => {
            return Err(Error::Timeout(timeout));
        }
        r = TcpStream::connect(server) => match r {
            Ok(stream) => stream,
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                return Err(Error::Refused(server));
            }
            Err(e) => {
                return Err(Error::IO(e));
            }
        }
    };
    println!("Connected successfully!\n");

    println!("Sending: {message}");
    stream.write_all(message.as_bytes()).await?;
    log::debug!("sent {} bytes", message.len());
    println!("Message sent.\n");

    println!("Waiting for response...");
    let response = recv_until::recv_until_marker(&mut stream, END_MARKER, timeout).await?;
    log::debug!("received {} bytes", response.len());
    Ok(response)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_config_file("./config.toml") {
        Ok(config) => config,
        Err(_) => Config::default(),
    };
    let server: SocketAddr = config.server.parse().unwrap();

    println!("{}", "=".repeat(60));
    println!("TCP client - sending message to the board");
    println!("{}", "=".repeat(60));
    println!();

    match send_and_receive(server, &config.message, config.timeout).await {
        Ok(response) if !response.is_empty() => {
            println!("Response received:");
            println!("{}", "=".repeat(60));
            println!("{}", String::from_utf8_lossy(&response));
            println!("{}", "=".repeat(60));
        }
        Ok(_) => {
            println!("No response received from server.");
        }
        Err(Error::Timeout(secs)) => {
            println!("Error: connection timed out after {secs} seconds");
            println!("Check if the board is powered on and connected to the network.");
        }
        Err(Error::Refused(addr)) => {
            println!("Error: connection refused by {addr}");
            println!("Check if the server application is running on the board.");
        }
        Err(Error::IO(e)) => {
            println!("Error: {e:?}");
        }
    }
    println!("\nConnection closed.");

    println!("\n{}", "=".repeat(60));
    println!("Done!");
    println!("{}", "=".repeat(60));
}
