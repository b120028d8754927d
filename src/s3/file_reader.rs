// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Re-openable, block-sized file reader used as an upload body source

use crate::s3::error::IoError;
use async_stream::try_stream;
use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Block size used when the file system does not report one.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Reads a file one block per call.
///
/// End of stream is an empty chunk, after which the handle is closed. Any
/// call made while the handle is closed opens the file again from byte 0,
/// so a transport that retries a request replays the same content.
#[derive(Debug)]
pub struct ChunkedFileReader {
    path: PathBuf,
    block_size: Option<usize>,
    remaining: u64,
    file: Option<(File, usize)>,
}

impl ChunkedFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_size: None,
            remaining: 0,
            file: None,
        }
    }

    /// Uses `block_size` instead of the block size the file system reports.
    pub fn with_block_size(path: impl Into<PathBuf>, block_size: usize) -> Self {
        Self {
            block_size: Some(block_size.max(1)),
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Bytes left to read in the current pass; zero while closed.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Closes the handle; the next read starts over from byte 0.
    pub fn reset(&mut self) {
        self.file = None;
        self.remaining = 0;
    }

    /// Returns a closed reader over the same file.
    pub fn rewound(&self) -> Self {
        Self {
            path: self.path.clone(),
            block_size: self.block_size,
            remaining: 0,
            file: None,
        }
    }

    async fn open(&mut self) -> Result<(), IoError> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| IoError::new(&self.path, e))?;
        let meta = file
            .metadata()
            .await
            .map_err(|e| IoError::new(&self.path, e))?;
        if !meta.is_file() {
            return Err(IoError::new(
                &self.path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let block_size = self.block_size.unwrap_or_else(|| device_block_size(&meta));
        self.remaining = meta.len();
        self.file = Some((file, block_size));
        Ok(())
    }

    /// Returns the next block of the file, or an empty chunk at end of stream.
    pub async fn next_chunk(&mut self) -> Result<Bytes, IoError> {
        if self.file.is_none() {
            self.open().await?;
        }
        if self.remaining == 0 {
            self.file = None;
            return Ok(Bytes::new());
        }

        let Some((file, block_size)) = self.file.as_mut() else {
            return Ok(Bytes::new());
        };
        let want = (*block_size as u64).min(self.remaining) as usize;
        let mut buf = BytesMut::zeroed(want);
        let mut filled = 0;
        while filled < want {
            match file.read(&mut buf[filled..]).await {
                Ok(0) => {
                    let remaining = self.remaining;
                    self.reset();
                    return Err(IoError::new(
                        &self.path,
                        io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("file ended with {remaining} bytes unread"),
                        ),
                    ));
                }
                Ok(n) => filled += n,
                Err(e) => {
                    self.reset();
                    return Err(IoError::new(&self.path, e));
                }
            }
        }
        self.remaining -= want as u64;
        Ok(buf.freeze())
    }

    /// Consumes the reader into a stream of non-empty chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, IoError>> + Send + 'static {
        try_stream! {
            let mut reader = self;
            loop {
                let chunk = reader.next_chunk().await?;
                if chunk.is_empty() {
                    break;
                }
                yield chunk;
            }
        }
    }
}

impl Clone for ChunkedFileReader {
    fn clone(&self) -> Self {
        self.rewound()
    }
}

#[cfg(unix)]
fn device_block_size(meta: &std::fs::Metadata) -> usize {
    use std::os::unix::fs::MetadataExt;
    match meta.blksize() {
        0 => DEFAULT_BLOCK_SIZE,
        n => n as usize,
    }
}

#[cfg(not(unix))]
fn device_block_size(_meta: &std::fs::Metadata) -> usize {
    DEFAULT_BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::io::Write;

    fn temp_file_with(data: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(data).unwrap();
        f.flush().unwrap();
        f
    }

    async fn drain(reader: &mut ChunkedFileReader) -> Vec<Bytes> {
        let mut chunks = Vec::new();
        loop {
            let chunk = reader.next_chunk().await.unwrap();
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test]
    async fn test_chunk_count_and_restart() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let file = temp_file_with(&data);
        let mut reader = ChunkedFileReader::with_block_size(file.path(), 4096);

        let first = drain(&mut reader).await;
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].len(), 4096);
        assert_eq!(first[2].len(), 10_000 - 2 * 4096);
        assert!(!reader.is_open());

        let second = drain(&mut reader).await;
        assert_eq!(first, second);
        assert_eq!(second.concat(), data);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_block_size() {
        let file = temp_file_with(&[7u8; 8192]);
        let mut reader = ChunkedFileReader::with_block_size(file.path(), 4096);
        assert_eq!(drain(&mut reader).await.len(), 2);
    }

    #[tokio::test]
    async fn test_reset_mid_stream_starts_over() {
        let file = temp_file_with(b"abcdefghij");
        let mut reader = ChunkedFileReader::with_block_size(file.path(), 4);
        assert_eq!(reader.next_chunk().await.unwrap(), "abcd");
        assert_eq!(reader.next_chunk().await.unwrap(), "efgh");
        reader.reset();
        assert_eq!(reader.next_chunk().await.unwrap(), "abcd");
        assert_eq!(reader.remaining(), 6);
    }

    #[tokio::test]
    async fn test_empty_file_yields_terminal_chunk_only() {
        let file = temp_file_with(b"");
        let mut reader = ChunkedFileReader::new(file.path());
        assert!(reader.next_chunk().await.unwrap().is_empty());
        assert!(!reader.is_open());
    }

    #[tokio::test]
    async fn test_open_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut missing = ChunkedFileReader::new(dir.path().join("absent"));
        let err = missing.next_chunk().await.unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);

        let mut not_regular = ChunkedFileReader::new(dir.path());
        let err = not_regular.next_chunk().await.unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_stream_and_clone_replay_content() {
        let file = temp_file_with(b"hello, world");
        let mut reader = ChunkedFileReader::with_block_size(file.path(), 5);
        reader.next_chunk().await.unwrap();

        let replay = reader.clone();
        let chunks: Vec<Bytes> = replay
            .into_stream()
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert_eq!(chunks.concat(), b"hello, world");
    }
}
