//! Test SCPI client.
//!
//! Sends program messages and reads newline-terminated responses.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test SCPI client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send a raw program message, adding `\n` if missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one response line, without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive one response line with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("Connection closed");
        }
        Ok(line.trim_end_matches('\n').to_string())
    }

    /// Receive raw bytes up to and including `delimiter`.
    #[allow(dead_code)]
    pub async fn recv_until(&mut self, delimiter: u8) -> anyhow::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let n = timeout(
            Duration::from_secs(5),
            self.reader.read_until(delimiter, &mut buf),
        )
        .await??;
        if n == 0 {
            anyhow::bail!("Connection closed");
        }
        Ok(buf)
    }

    /// Send a query and return its response line.
    pub async fn query(&mut self, line: &str) -> anyhow::Result<String> {
        self.send_raw(line).await?;
        self.recv().await
    }

    /// Assert that nothing arrives within `dur`.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Err(_) => Ok(()),
            Ok(line) => anyhow::bail!("Unexpected response: {:?}", line),
        }
    }
}
