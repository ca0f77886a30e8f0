pub mod camera;
pub mod config;
pub mod constants;
pub mod firebase;
pub mod guestbook;
pub mod orbit;
pub mod panel;
pub mod picking;
pub mod scene;
pub mod session;
pub mod store;
pub mod timestamp;

pub use camera::*;
pub use config::{Backend, BuildProfile, ConfigError, FirebaseConfig};
pub use guestbook::*;
pub use orbit::OrbitControls;
pub use panel::*;
pub use session::*;
pub use store::*;
pub use timestamp::{Timestamp, TimestampError};
