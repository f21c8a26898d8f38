pub mod decorator;
pub mod frame;

pub use decorator::{DefaultDecorator, FrameChrome, HeaderBadge, WindowDecorator};
pub use frame::{FrameHit, WindowFrame};
