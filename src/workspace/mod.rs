//! Filesystem side of a run: directory navigation and config file mutation

pub mod config_file;
pub mod navigator;

pub use config_file::{strip_comments, CommentPolicy, ConfigDocument, ConfigFileError, ConfigMutator};
pub use navigator::{WorkspaceError, WorkspaceNavigator};
