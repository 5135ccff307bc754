//! Streamed response bodies.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use http::StatusCode;
use http_body::Body;
use pin_project_lite::pin_project;

use super::Metadata;
use crate::ClientError;
use crate::transport::ResponseBody;

pin_project! {
    /// The body of a successful response, yielded chunk by chunk.
    ///
    /// Dropping the stream releases the underlying connection.
    pub struct ByteStream {
        #[pin]
        body: ResponseBody,
        status: StatusCode,
        headers: Metadata,
    }
}

impl ByteStream {
    pub(crate) fn new(status: StatusCode, headers: Metadata, body: ResponseBody) -> Self {
        Self {
            body,
            status,
            headers,
        }
    }

    /// Response status.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &Metadata {
        &self.headers
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes, ClientError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut body = self.project().body;
        loop {
            return match body.as_mut().poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => match frame.into_data() {
                    Ok(data) => Poll::Ready(Some(Ok(data))),
                    // trailers
                    Err(_) => continue,
                },
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            };
        }
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use http_body_util::{BodyExt, Full};

    #[tokio::test]
    async fn test_yields_body_chunks() {
        let body = Full::new(Bytes::from_static(b"line 1\nline 2\n"))
            .map_err(|never| match never {})
            .boxed_unsync();
        let mut stream = ByteStream::new(StatusCode::OK, Metadata::empty(), body);

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"line 1\nline 2\n");
        assert_eq!(stream.status_code(), StatusCode::OK);
    }
}
