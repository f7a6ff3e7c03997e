mod download;
mod upload;

pub use self::download::Download;
pub use self::upload::Upload;
