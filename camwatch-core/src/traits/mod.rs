//! Collaborator traits
//!
//! These traits define the interface between the application logic and the
//! parts of the watch it does not own: the message transport, the vibration
//! motor and the screen.

pub mod haptics;
pub mod surface;
pub mod transport;

pub use haptics::{Haptics, VibePattern};
pub use surface::{FaceView, Surface};
pub use transport::{MessageTransport, TransportError};
