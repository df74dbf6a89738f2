//! Frame sequence to byte stream adapter.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream::{self, Stream};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, warn};

use crate::error::{TtsError, TtsResult};
use crate::frame::decode_frame;

/// Decoded audio chunks in arrival order.
pub type AudioStream = Pin<Box<dyn Stream<Item = TtsResult<Bytes>> + Send>>;

/// Adapt a provider socket into a stream of decoded audio chunks.
///
/// The stream ends after a frame with `isFinal: true` (the socket is closed
/// first) or when the provider closes the socket. A transport or provider
/// error is yielded once and then the stream ends. Frames without audio
/// never produce an item.
pub fn audio_chunks<S>(socket: S) -> impl Stream<Item = TtsResult<Bytes>> + Send
where
    S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin + Send,
{
    stream::unfold(Some(socket), |state| async move {
        let mut socket = match state {
            Some(socket) => socket,
            None => return None,
        };

        loop {
            let text = match socket.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Provider closed the stream");
                    return None;
                }
                // Ping/pong is handled by tungstenite; binary frames are not part of the protocol.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Some((Err(TtsError::from(e)), None)),
                None => return None,
            };

            let decoded = match decode_frame(&text) {
                Ok(Some(decoded)) => decoded,
                Ok(None) => continue,
                Err(e) => {
                    close_quietly(&mut socket).await;
                    return Some((Err(e), None));
                }
            };

            if decoded.is_final {
                close_quietly(&mut socket).await;
                return decoded.chunk.map(|chunk| (Ok(chunk), None));
            }

            if let Some(chunk) = decoded.chunk {
                return Some((Ok(chunk), Some(socket)));
            }
        }
    })
}

async fn close_quietly<S>(socket: &mut S)
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    if let Err(e) = socket.close().await {
        warn!("Failed to close provider socket: {}", e);
    }
}
