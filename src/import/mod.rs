pub mod local_importer;
pub mod media_index;

pub use local_importer::{ImportError, LocalImporter};
pub use media_index::{FsMediaIndex, LocalAudioRecord, MediaIndex, MediaIndexError};
