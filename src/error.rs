// Crate error type.
// Every variant states *where* things went wrong. Invalid interactive geometry
// never lands here: overlays clamp or fall back locally instead.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing a frame to the window failed

    #[error("image error: {0}")]
    ImageLoad(#[from] image::ImageError), // Decoding a source image (or writing a result) failed

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error), // Config file is not valid JSON for our schema

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("widget #{0} is not part of this layout")]
    MissingWidget(u32), // A handle was looked up in a tree that doesn't own it

    #[error("frame size mismatch: {0}")]
    SizeMismatch(String), // Two buffers that must line up pixel-for-pixel don't

    #[error("mask predictions shape mismatch: {0}")]
    MaskShape(String),

    #[error("radio constraint needs at least one item")]
    EmptyConstraint,
}
