use std::io::SeekFrom;

use bytes::Bytes;
use log::{debug, info};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::files::error::FsError;
use crate::files::mime;
use crate::files::range::RangeSpec;
use crate::files::resolver::ResolvedPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Whole file; HTTP 200.
    Full,
    /// Contiguous subrange; HTTP 206.
    Partial,
}

/// Response metadata computed when a stream is opened.
#[derive(Debug)]
pub struct StreamMeta {
    pub status: StreamStatus,
    pub content_type: &'static str,
    pub content_length: u64,
    /// `bytes <start>-<end>/<size>`; present only for partial responses.
    pub content_range: Option<String>,
    pub file_size: u64,
}

#[derive(Debug)]
enum SessionState {
    Streaming,
    Closed,
}

/// One in-flight file read: an open handle, a cursor already positioned
/// at the range start, and a countdown of bytes still to emit.
///
/// The session moves from `Streaming` to `Closed` exactly once, whether
/// it completes, hits an I/O error, or is dropped mid-stream by a client
/// disconnect; the handle is released in every case.
#[derive(Debug)]
pub struct StreamSession {
    file: fs::File,
    remaining: u64,
    chunk_size: usize,
    state: SessionState,
}

impl StreamSession {
    /// Opens `resolved` for streaming, honoring an optional range header.
    ///
    /// A malformed range expression is not an error: the header is
    /// ignored and the full content is served, since range handling is an
    /// optimization the client can live without. An unsatisfiable range
    /// is surfaced so the caller can answer 416.
    pub async fn open(
        resolved: &ResolvedPath,
        range_header: Option<&str>,
        chunk_size: usize,
    ) -> Result<(StreamSession, StreamMeta), FsError> {
        if !resolved.is_file() {
            return Err(FsError::NotAFile);
        }

        let file_size = resolved.metadata().len();
        let content_type = resolved
            .file_name()
            .map(mime::content_type_for)
            .unwrap_or(mime::OCTET_STREAM);

        let range = match range_header {
            None => None,
            Some(header) => match RangeSpec::parse(header, file_size) {
                Ok(spec) => Some(spec),
                Err(FsError::RangeMalformed) => {
                    info!("ignoring malformed range header {:?}", header);
                    None
                }
                Err(e) => return Err(e),
            },
        };

        let mut file = fs::File::open(resolved.absolute())
            .await
            .map_err(FsError::from_read_io)?;

        let meta = match range {
            Some(spec) => {
                file.seek(SeekFrom::Start(spec.start))
                    .await
                    .map_err(FsError::from_read_io)?;
                debug!(
                    "streaming {:?} bytes {}-{}/{}",
                    resolved.absolute(),
                    spec.start,
                    spec.end,
                    file_size
                );
                StreamMeta {
                    status: StreamStatus::Partial,
                    content_type,
                    content_length: spec.len(),
                    content_range: Some(format!(
                        "bytes {}-{}/{}",
                        spec.start, spec.end, file_size
                    )),
                    file_size,
                }
            }
            None => StreamMeta {
                status: StreamStatus::Full,
                content_type,
                content_length: file_size,
                content_range: None,
                file_size,
            },
        };

        let session = StreamSession {
            file,
            remaining: meta.content_length,
            chunk_size,
            state: SessionState::Streaming,
        };
        Ok((session, meta))
    }

    /// Reads the next bounded chunk. Returns `Ok(None)` exactly once,
    /// after the final byte of the requested span has been emitted.
    ///
    /// The file shrinking underneath an open session surfaces as an
    /// unexpected-EOF error; the client retries with a fresh range
    /// request if it cares.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, FsError> {
        if matches!(self.state, SessionState::Closed) || self.remaining == 0 {
            self.state = SessionState::Closed;
            return Ok(None);
        }

        let want = self.remaining.min(self.chunk_size as u64) as usize;
        let mut buf = vec![0u8; want];
        let n = match self.file.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                self.state = SessionState::Closed;
                return Err(FsError::Io(e));
            }
        };
        if n == 0 {
            self.state = SessionState::Closed;
            return Err(FsError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "file truncated while streaming",
            )));
        }

        buf.truncate(n);
        self.remaining -= n as u64;
        Ok(Some(Bytes::from(buf)))
    }

    /// Drains the session into one buffer. Test helper; request handlers
    /// forward chunks as they arrive instead.
    #[cfg(test)]
    pub async fn collect(mut self) -> Result<Vec<u8>, FsError> {
        let mut out = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }
}
