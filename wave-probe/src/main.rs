use std::net::SocketAddr;

use config_file::FromConfigFile;
use serde::Deserialize;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

pub mod plot;
pub mod wave;

use time::{macros::format_description, UtcOffset};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;

pub fn init_log() -> Option<WorkerGuard> {
    let local_time = OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"),
    );
    if !cfg!(debug_assertions) {
        let file_appender = tracing_appender::rolling::daily("logs", "wave-probe");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_timer(local_time)
            .with_max_level(tracing::Level::INFO)
            .with_writer(non_blocking)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_timer(local_time).init();
        None
    }
}

#[derive(Deserialize)]
struct Config {
    server: String,
    num_samples: usize,
    sample_rate: u32,
    plot_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: "192.168.1.100:7".into(),
            num_samples: 256,
            sample_rate: 256,
            plot_file: format!("wave-{}.svg", chrono::Local::now().format("%Y%m%d-%H%M%S")),
        }
    }
}

async fn read_reply(len: usize, stream: &mut TcpStream) -> Result<Vec<u8>, std::io::Error> {
    let mut buf = Vec::new();
    buf.resize(len, b'\0');
    let mut read_len = 0;
    loop {
        if read_len == len {
            return Ok(buf);
        }
        match stream.read(&mut buf[read_len..]).await {
            Ok(size) => {
                if size == 0 {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::ConnectionAborted,
                        "peer closed before the reply was complete",
                    ));
                }
                read_len += size;
            }
            Err(e) => {
                return Err(e);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let _log_guard = init_log();

    let config = match Config::from_config_file("./wave_config.toml") {
        Ok(config) => config,
        Err(_) => Config::default(),
    };
    let server: SocketAddr = config.server.parse().unwrap();

    println!("{}", "~".repeat(52));
    let sine_wave = wave::generate_random_sine_wave(config.num_samples, config.sample_rate);

    let mut stream = match TcpStream::connect(server).await {
        Ok(stream) => stream,
        Err(e) => {
            panic!("cannot connect to {server}: {e:?}");
        }
    };
    println!("Connected to server at {server}");
    println!("{}", "~".repeat(52));
    tracing::info!("connected to {server}");

    stream
        .write_all(&wave::pack_samples(&sine_wave))
        .await
        .unwrap();
    println!("Sent data.");
    println!("{}", "~".repeat(52));
    tracing::info!("sent {} samples", sine_wave.len());

    let raw_response = read_reply(config.num_samples * 4, &mut stream)
        .await
        .unwrap();
    println!("Received data.");
    let received = wave::unpack_samples(&raw_response);
    tracing::info!("received {} samples", received.len());

    plot::render(&sine_wave, &received, &config.plot_file).unwrap();
    println!("Plot written to {}", config.plot_file);

    drop(stream);
    println!("Connection closed.");
    println!("{}", "~".repeat(52));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn echoed_samples_round_trip_byte_for_byte() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 256 * 4];
            stream.read_exact(&mut buf).await.unwrap();
            // echo in two pieces so the reader has to resume
            stream.write_all(&buf[..100]).await.unwrap();
            stream.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            stream.write_all(&buf[100..]).await.unwrap();
        });

        let sine_wave = wave::generate_random_sine_wave(256, 256);
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(&wave::pack_samples(&sine_wave))
            .await
            .unwrap();

        let raw = read_reply(256 * 4, &mut stream).await.unwrap();
        assert_eq!(raw, wave::pack_samples(&sine_wave));
        assert_eq!(wave::unpack_samples(&raw), sine_wave);
    }

    #[tokio::test]
    async fn early_close_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(&[0u8; 8]).await.unwrap();
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let err = read_reply(16, &mut stream).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::ConnectionAborted);
    }

    #[test]
    fn default_config_targets_the_board_echo_port() {
        let config = Config::default();
        assert_eq!(config.server, "192.168.1.100:7");
        assert_eq!(config.num_samples, 256);
        assert_eq!(config.sample_rate, 256);
    }
}
