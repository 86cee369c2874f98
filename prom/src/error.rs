use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid row template: {0}")]
    Template(String),

    #[error("Malformed blueprint JSON")]
    Json(#[from] serde_json::Error),

    #[error("Blueprint has {0} rows but {1} signal sets were given")]
    RowCount(usize, usize),

    #[error("Blueprint string is empty")]
    Empty,

    #[error("Invalid base64 in blueprint string")]
    Base64(#[from] base64::DecodeError),

    #[error("Blueprint is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to (de)compress blueprint")]
    Io(#[from] std::io::Error),
}
