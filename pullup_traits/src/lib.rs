//! Seams between the pull-up classifier and the outside world.
//!
//! The classifier never talks to a camera, decoder or detector directly. Anything that
//! yields frames of keypoints implements [`FrameSource`].

/// A producer of per-frame keypoint data (detector, JSON replay, test fixture, ...).
///
/// Implementations may block; `Ok(None)` signals a cleanly finished stream.
pub trait FrameSource {
    type Frame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    type Frame = S::Frame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_frame()
    }
}

/// Source backed by any iterator of frames; handy for fixtures and pre-decoded streams.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Iterator> FrameSource for IterSource<I> {
    type Frame = I::Item;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inner.next())
    }
}
