//! Screen the face is painted on

use crate::config::Layout;

/// Everything needed to paint one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceView<'a> {
    /// "HH:MM"
    pub time_text: &'a str,
    /// Where the text and indicators go
    pub layout: &'a Layout,
}

/// Trait for the paint target
///
/// Painting the same view twice must produce the same frame.
pub trait Surface {
    /// Error type for paint operations
    type Error;

    /// Paint a complete frame
    fn paint(&mut self, view: &FaceView<'_>) -> Result<(), Self::Error>;
}
