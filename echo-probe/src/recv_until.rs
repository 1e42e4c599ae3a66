use tokio::{io::AsyncReadExt, net::TcpStream};

// The timeout covers each read on its own, like a per-recv socket
// timeout. Running out of time returns whatever has been gathered.
pub async fn recv_until_marker(
    stream: &mut TcpStream,
    marker: &[u8],
    timeout: u64,
) -> Result<Vec<u8>, std::io::Error> {
    let mut response = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(timeout)) => {
                // no more data coming
                return Ok(response);
            }
            r = stream.read(&mut chunk) => match r {
                Ok(size) => {
                    if size == 0 {
                        return Ok(response);
                    }
                    response.extend_from_slice(&chunk[..size]);
                    if contains(&response, marker) {
                        return Ok(response);
                    }
                }
                Err(e) => {
                    return Err(e);
                }
            }
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn contains_finds_needle_anywhere() {
        assert!(contains(b"head === tail", b"==="));
        assert!(contains(b"===", b"==="));
        assert!(!contains(b"= = =", b"==="));
        assert!(!contains(b"==", b"==="));
    }

    #[tokio::test]
    async fn marker_split_across_chunks_still_ends_the_read() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"reply body\n======").await.unwrap();
            stream.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            stream.write_all(b"===============").await.unwrap();
            stream.flush().await.unwrap();
            // keep the socket open so only the marker can end the read
            tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let started = std::time::Instant::now();
        let response = recv_until_marker(&mut stream, b"=====================", 5)
            .await
            .unwrap();
        assert!(contains(&response, b"====================="));
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }
}
