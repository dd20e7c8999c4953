// Pixel-buffer UI toolkit for small image tool windows: a layout engine
// that composes nested stacks into one frame, interactive overlays that turn
// pointer input into normalized geometry, and two ready-made tools built on
// them (image cropping and segmentation prompting).

pub mod arrange;
pub mod config;
pub mod crop_ui;
pub mod draw;
pub mod error;
pub mod gamma;
pub mod geometry;
pub mod node;
pub mod overlays;
pub mod prompt_ui;
pub mod radio;
pub mod stack;
pub mod types;
pub mod vision;
pub mod widgets;
pub mod window;

pub use error::Error;
pub use node::{Handle, Node};
pub use types::FrameBuffer;
