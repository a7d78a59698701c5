//! Preview surface and its frame sink.

use tokio::sync::mpsc;
use tracing::debug;

use super::Frame;

/// Frame sink attached to a [`PreviewSurface`].
///
/// Cloneable so it can be handed to the device provider on every rebind;
/// all clones feed the same surface. Created once, together with its
/// surface, by [`PreviewSurface::new`].
#[derive(Clone)]
pub struct PreviewOutput {
    sender: mpsc::UnboundedSender<Frame>,
}

impl PreviewOutput {
    /// Pushes a frame to the surface.
    ///
    /// Returns `false` when the surface is gone; producers should stop
    /// streaming at that point.
    pub fn push(&self, frame: Frame) -> bool {
        self.sender.send(frame).is_ok()
    }
}

/// A passive rendering target for the live camera feed.
///
/// The platform would hand these frames to a view widget; here the surface
/// simply exposes them to the caller, tracking the most recent frame and a
/// running count.
pub struct PreviewSurface {
    receiver: mpsc::UnboundedReceiver<Frame>,
    last_frame: Option<Frame>,
    received: u64,
}

impl PreviewSurface {
    /// Creates a surface together with its single attached output.
    pub fn new() -> (Self, PreviewOutput) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let surface = Self {
            receiver,
            last_frame: None,
            received: 0,
        };
        (surface, PreviewOutput { sender })
    }

    /// Waits for the next frame. Returns `None` once every output clone
    /// has been dropped.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        let frame = self.receiver.recv().await?;
        self.record(frame)
    }

    /// Returns the next frame if one is already queued.
    pub fn try_next_frame(&mut self) -> Option<Frame> {
        let frame = self.receiver.try_recv().ok()?;
        self.record(frame)
    }

    /// Returns the most recently received frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Returns the total number of frames received.
    pub fn frames_received(&self) -> u64 {
        self.received
    }

    fn record(&mut self, frame: Frame) -> Option<Frame> {
        self.received += 1;
        if self.received == 1 {
            debug!(sequence = frame.sequence(), lens = %frame.lens(), "first preview frame arrived");
        }
        self.last_frame = Some(frame.clone());
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::LensSelection;

    fn frame(sequence: u64) -> Frame {
        Frame::new(vec![0u8; 4], 2, 2, sequence, LensSelection::Back)
    }

    #[test]
    fn test_push_and_receive() {
        let (mut surface, output) = PreviewSurface::new();

        assert!(surface.try_next_frame().is_none());
        assert!(output.push(frame(1)));
        assert!(output.push(frame(2)));

        assert_eq!(surface.try_next_frame().unwrap().sequence(), 1);
        assert_eq!(surface.try_next_frame().unwrap().sequence(), 2);
        assert_eq!(surface.frames_received(), 2);
        assert_eq!(surface.last_frame().unwrap().sequence(), 2);
    }

    #[test]
    fn test_push_after_surface_dropped() {
        let (surface, output) = PreviewSurface::new();
        drop(surface);

        assert!(!output.push(frame(1)));
    }

    #[tokio::test]
    async fn test_next_frame_awaits_delivery() {
        let (mut surface, output) = PreviewSurface::new();

        let sender = tokio::spawn(async move {
            output.push(frame(7));
        });

        let frame = surface.next_frame().await.unwrap();
        assert_eq!(frame.sequence(), 7);
        sender.await.unwrap();
    }
}
