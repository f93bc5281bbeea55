//! Core of a cloud-drive image viewer
//!
//! Fit and zoom geometry, a virtualized thumbnail grid, cross-folder
//! navigation over a paged drive, preload selection and gesture
//! interpretation. Nothing here renders; the `drive-photos` binary (feature
//! `gui`) wires it into an iced window.

pub mod config;
pub mod drive;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod grid;
pub mod nav;
pub mod preload;
pub mod session;
pub mod storage;

pub use config::ViewerConfig;
pub use error::{DriveError, StorageError};
pub use session::Session;
