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

//! Request body sources and the file sink used by downloads

use crate::s3::error::{Error, IoError};
use crate::s3::file_reader::ChunkedFileReader;
use crate::s3::http::ResponseSink;
use async_trait::async_trait;
use bytes::Bytes;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Body of an upload: bytes held in memory, or a file streamed block by block.
#[derive(Clone, Debug)]
pub enum ObjectContent {
    Bytes(Bytes),
    File(ChunkedFileReader),
}

impl From<Bytes> for ObjectContent {
    fn from(value: Bytes) -> Self {
        ObjectContent::Bytes(value)
    }
}

impl From<String> for ObjectContent {
    fn from(value: String) -> Self {
        ObjectContent::Bytes(Bytes::from(value))
    }
}

impl From<Vec<u8>> for ObjectContent {
    fn from(value: Vec<u8>) -> Self {
        ObjectContent::Bytes(Bytes::from(value))
    }
}

impl From<&'static str> for ObjectContent {
    fn from(value: &'static str) -> Self {
        ObjectContent::Bytes(Bytes::from(value))
    }
}

impl From<&Path> for ObjectContent {
    fn from(value: &Path) -> Self {
        ObjectContent::File(ChunkedFileReader::new(value))
    }
}

impl From<ChunkedFileReader> for ObjectContent {
    fn from(value: ChunkedFileReader) -> Self {
        ObjectContent::File(value)
    }
}

/// Writes a streamed response body to a file.
///
/// Chunks go to a hidden sibling `.<name>.part` file that is created on the
/// first chunk and renamed over the destination by [`finish`](Self::finish).
/// The destination is not touched until the whole body has arrived.
#[derive(Debug)]
pub(crate) struct FileSink {
    path: PathBuf,
    part_path: PathBuf,
    file: Option<File>,
    written: u64,
}

impl FileSink {
    pub(crate) fn new(path: &Path) -> Self {
        let mut part_name = OsString::from(".");
        part_name.push(path.file_name().unwrap_or_default());
        part_name.push(".part");
        Self {
            path: path.to_path_buf(),
            part_path: path.with_file_name(part_name),
            file: None,
            written: 0,
        }
    }

    async fn file(&mut self) -> Result<&mut File, IoError> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(&self.part_path)
                .await
                .map_err(|e| IoError::new(&self.part_path, e))?,
        };
        Ok(self.file.insert(file))
    }

    /// Flushes the part file and moves it over the destination, returning the
    /// number of bytes written. An empty body still produces an empty file.
    pub(crate) async fn finish(mut self) -> Result<u64, IoError> {
        let part_path = self.part_path.clone();
        let file = self.file().await?;
        file.flush()
            .await
            .map_err(|e| IoError::new(&part_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| IoError::new(&part_path, e))?;
        self.file = None;
        if let Err(e) = tokio::fs::rename(&self.part_path, &self.path).await {
            let _ = tokio::fs::remove_file(&self.part_path).await;
            return Err(IoError::new(&self.path, e));
        }
        Ok(self.written)
    }

    /// Drops whatever was received so far. The destination is left as it was.
    pub(crate) async fn discard(mut self) {
        if self.file.take().is_none() {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(&self.part_path).await {
            log::debug!("could not remove {:?}: {e}", self.part_path);
        }
    }
}

#[async_trait]
impl ResponseSink for FileSink {
    async fn consume(&mut self, chunk: Bytes) -> Result<(), Error> {
        self.file()
            .await?
            .write_all(&chunk)
            .await
            .map_err(|e| IoError::new(&self.part_path, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_sink_writes_all_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        let mut sink = FileSink::new(&path);
        sink.consume(Bytes::from_static(b"hello, ")).await.unwrap();
        sink.consume(Bytes::from_static(b"world")).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"old");
        assert_eq!(sink.finish().await.unwrap(), 12);

        assert_eq!(std::fs::read(&path).unwrap(), b"hello, world");
        assert!(!dir.path().join(".out.bin.part").exists());
    }

    #[tokio::test]
    async fn test_file_sink_discard_keeps_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"previous contents").unwrap();

        let mut sink = FileSink::new(&path);
        sink.consume(Bytes::from_static(b"partial")).await.unwrap();
        sink.discard().await;

        assert_eq!(std::fs::read(&path).unwrap(), b"previous contents");
        assert!(!dir.path().join(".out.bin.part").exists());
    }

    #[tokio::test]
    async fn test_file_sink_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        assert_eq!(FileSink::new(&path).finish().await.unwrap(), 0);
        assert!(std::fs::read(&path).unwrap().is_empty());
    }
}
