//! Seam to the forward converter (markup -> text), used only for
//! verification.

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("converter failed: {message}")]
    Failed { message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns storage markup back into text. Must be a pure function of its input.
pub trait ForwardConverter {
    fn convert(&self, markup: &str) -> Result<String, ConvertError>;
}

impl<F> ForwardConverter for F
where
    F: Fn(&str) -> Result<String, ConvertError>,
{
    fn convert(&self, markup: &str) -> Result<String, ConvertError> {
        self(markup)
    }
}
