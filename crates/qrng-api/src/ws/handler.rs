/*
[INPUT]:  Session events (data chunks, errors, close)
[OUTPUT]: Caller-observed callbacks or channel messages
[POS]:    WebSocket layer - event delivery seam
[UPDATE]: When adding event kinds or handler adapters
*/

use crate::error::QrngError;
use tokio::sync::mpsc;

/// Event forwarded by the channel-backed handlers
#[derive(Debug)]
pub enum StreamEvent {
    Data(String),
    Error(QrngError),
    Closed,
}

/// Observer for a stream session
///
/// Methods are called from a single task, one at a time, in the order the
/// frames arrived.
pub trait StreamHandler: Send + 'static {
    fn on_data(&mut self, data: String);

    fn on_error(&mut self, _error: QrngError) {}

    fn on_close(&mut self) {}
}

type DataFn = Box<dyn FnMut(String) + Send>;
type ErrorFn = Box<dyn FnMut(QrngError) + Send>;
type CloseFn = Box<dyn FnMut() + Send>;

/// Closure-based handler: `on_data` is required, the others are optional
pub struct StreamCallbacks {
    on_data: DataFn,
    on_error: Option<ErrorFn>,
    on_close: Option<CloseFn>,
}

impl StreamCallbacks {
    pub fn new(on_data: impl FnMut(String) + Send + 'static) -> Self {
        Self {
            on_data: Box::new(on_data),
            on_error: None,
            on_close: None,
        }
    }

    pub fn with_on_error(mut self, on_error: impl FnMut(QrngError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn with_on_close(mut self, on_close: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }
}

impl std::fmt::Debug for StreamCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCallbacks")
            .field("on_error", &self.on_error.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

impl StreamHandler for StreamCallbacks {
    fn on_data(&mut self, data: String) {
        (self.on_data)(data);
    }

    fn on_error(&mut self, error: QrngError) {
        if let Some(on_error) = self.on_error.as_mut() {
            on_error(error);
        }
    }

    fn on_close(&mut self) {
        if let Some(on_close) = self.on_close.as_mut() {
            on_close();
        }
    }
}

// Send failures mean the receiver is gone; the event is dropped.
impl StreamHandler for mpsc::UnboundedSender<StreamEvent> {
    fn on_data(&mut self, data: String) {
        let _ = self.send(StreamEvent::Data(data));
    }

    fn on_error(&mut self, error: QrngError) {
        let _ = self.send(StreamEvent::Error(error));
    }

    fn on_close(&mut self) {
        let _ = self.send(StreamEvent::Closed);
    }
}

/// Lossless adapter for a bounded channel
///
/// Events are queued without limit and a forwarder task feeds them into the
/// bounded sender with `send().await`, in order. The forwarder exits once the
/// session drops this handler and the queue is drained, or when the receiver
/// is gone. Must be created inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct ForwardingSender {
    queue: mpsc::UnboundedSender<StreamEvent>,
}

impl ForwardingSender {
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        let (queue, mut queue_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(event) = queue_rx.recv().await {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Self { queue }
    }
}

impl From<mpsc::Sender<StreamEvent>> for ForwardingSender {
    fn from(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self::new(tx)
    }
}

impl StreamHandler for ForwardingSender {
    fn on_data(&mut self, data: String) {
        self.queue.on_data(data);
    }

    fn on_error(&mut self, error: QrngError) {
        self.queue.on_error(error);
    }

    fn on_close(&mut self) {
        self.queue.on_close();
    }
}
