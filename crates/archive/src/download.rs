use std::{
    path::PathBuf,
    pin::Pin,
    task::{Context, Poll},
};

use {
    futures::Stream,
    tokio::fs::File,
    tokio_util::{bytes::Bytes, io::ReaderStream},
    tracing::{debug, warn},
};

/// A single-use byte stream over an artifact's backing file.
///
/// The stream is finite and not restartable. The backing file is deleted the
/// moment the last chunk has been yielded; if the stream is dropped before
/// completion (client disconnect, handler abort) the `Drop` impl deletes it
/// instead. Either way the token is consumed.
#[derive(Debug)]
pub struct Download {
    token: String,
    inner: ReaderStream<File>,
    // Present until the backing file has been deleted.
    path: Option<PathBuf>,
}

impl Download {
    pub(crate) fn new(token: String, path: PathBuf, file: File) -> Self {
        Self {
            token,
            inner: ReaderStream::new(file),
            path: Some(path),
        }
    }

    /// The token this download consumes.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// MIME type derived from the token's extension.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        if self.token.ends_with(".txt") {
            "text/plain; charset=utf-8"
        } else {
            "application/json"
        }
    }

    fn consume(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(token = %self.token, "consumed single-use artifact"),
            Err(e) => warn!(token = %self.token, error = %e, "failed to delete served artifact"),
        }
    }
}

impl Stream for Download {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(None) => {
                this.consume();
                Poll::Ready(None)
            },
            other => other,
        }
    }
}

impl Drop for Download {
    fn drop(&mut self) {
        self.consume();
    }
}
