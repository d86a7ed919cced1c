//! Framed TCP submission and response streaming.
//!
//! One submission = one connection = one blocking call from the caller's
//! perspective. The request frame, in order: filename (i32 length prefix),
//! file size (i64), raw file bytes in chunks with a progress callback per
//! chunk, serialized config (i32 length prefix), lowercase hex SHA-256 of
//! the file bytes (i32 length prefix). All integers big-endian, all text
//! UTF-8. Responses are i32-length-prefixed UTF-8 messages until a
//! zero-length terminator.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::error::ClientError;

/// Per-read timeout applied to each length prefix and message body.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

const SEND_CHUNK_SIZE: usize = 4096;
const HASH_CHUNK_SIZE: usize = 8192;

/// Submit a source file plus serialized config and collect the response
/// stream.
///
/// `on_progress` is invoked synchronously after each chunk with
/// `bytes_sent / file_size`: non-decreasing, in (0.0, 1.0], exactly 1.0
/// after the final chunk. Callback N completes before chunk N+1 is written.
///
/// Messages come back in arrival order and are never partially delivered:
/// either all declared bytes are read or the call fails. An EOF or
/// connection reset while waiting for the next length prefix is an implicit
/// terminator; an EOF or timeout inside a declared-length body is fatal.
pub async fn submit(
    file_path: &Path,
    config_json: &str,
    host: &str,
    port: u16,
    read_timeout: Duration,
    mut on_progress: impl FnMut(f64),
) -> Result<Vec<String>, ClientError> {
    let metadata = tokio::fs::metadata(file_path)
        .await
        .map_err(|_| ClientError::SourceFileMissing(file_path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(ClientError::SourceFileMissing(file_path.to_path_buf()));
    }
    let file_size = metadata.len();
    let filename = file_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ClientError::SourceFileMissing(file_path.to_path_buf()))?;

    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| ClientError::Connect {
            host: host.to_string(),
            port,
            source,
        })?;

    debug!(
        filename = %filename,
        file_size,
        config_bytes = config_json.len(),
        "sending submission frame"
    );

    // 1. Filename, bare name only, with length prefix.
    stream.write_i32(filename.len() as i32).await?;
    stream.write_all(filename.as_bytes()).await?;

    // 2. File size.
    stream.write_i64(file_size as i64).await?;

    // 3. File content, chunked, progress after every chunk.
    let mut file = tokio::fs::File::open(file_path).await?;
    let mut buffer = vec![0u8; SEND_CHUNK_SIZE];
    let mut sent: u64 = 0;
    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        stream.write_all(&buffer[..n]).await?;
        sent += n as u64;
        on_progress(sent as f64 / file_size as f64);
    }

    // 4. Serialized config with length prefix.
    stream.write_i32(config_json.len() as i32).await?;
    stream.write_all(config_json.as_bytes()).await?;

    // 5. SHA-256 of the file bytes, from an independent second read.
    let hash = sha256_file(file_path).await?;
    stream.write_i32(hash.len() as i32).await?;
    stream.write_all(hash.as_bytes()).await?;
    stream.flush().await?;

    read_responses(&mut stream, read_timeout).await
}

async fn read_responses(
    stream: &mut TcpStream,
    read_timeout: Duration,
) -> Result<Vec<String>, ClientError> {
    let mut messages = Vec::new();
    loop {
        let length = match timeout(read_timeout, stream.read_i32()).await {
            Err(_) => return Err(ClientError::ReadTimeout(read_timeout)),
            // End-of-stream or an abortive close while waiting for the next
            // length prefix is an implicit terminator, never an error.
            Ok(Err(e)) if is_stream_end(e.kind()) => {
                debug!(
                    messages = messages.len(),
                    kind = ?e.kind(),
                    "stream closed without explicit terminator"
                );
                break;
            }
            Ok(Err(e)) => return Err(e.into()),
            Ok(Ok(length)) => length,
        };

        if length == 0 {
            debug!(messages = messages.len(), "received explicit terminator");
            break;
        }
        if length < 0 {
            return Err(ClientError::BadMessageLength(length));
        }

        let mut body = vec![0u8; length as usize];
        match timeout(read_timeout, stream.read_exact(&mut body)).await {
            Err(_) => return Err(ClientError::ReadTimeout(read_timeout)),
            // EOF inside a declared-length body means a truncated message.
            Ok(Err(e)) => return Err(e.into()),
            Ok(Ok(_)) => {}
        }
        messages.push(String::from_utf8_lossy(&body).into_owned());
    }
    Ok(messages)
}

fn is_stream_end(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}

/// Lowercase hex SHA-256 of the file contents, streamed from disk.
async fn sha256_file(path: &Path) -> Result<String, std::io::Error> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    let digest = hasher.finalize();
    Ok(format!("{digest:x}"))
}
