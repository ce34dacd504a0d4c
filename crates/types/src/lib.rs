pub mod color;
pub mod document;
pub mod geometry;

pub use color::Color;
pub use document::{Destination, TocEntry};
pub use geometry::{Matrix, Point, Rect};
