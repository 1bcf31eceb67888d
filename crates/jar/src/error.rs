use thiserror::Error;

#[derive(Debug, Error)]
pub enum JarError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
