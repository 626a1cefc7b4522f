use std::path::PathBuf;

/// Configuration of the post-processing pipeline.
#[derive(Debug, Clone)]
pub struct PostProcessSettings {
    /// Root that reported paths are made relative to.
    pub storage_root: PathBuf,
    /// Re-encode raw files to mp4 instead of renaming them.
    pub convert_to_mp4: bool,
    /// Encoder program used for conversion.
    pub encoder_program: String,
    /// Encoder arguments placed before `-i <raw>`.
    pub pre_input: String,
    /// Encoder arguments placed after `-i <raw>`.
    pub post_input: String,
    /// Scripts run with a JSON description of every finalized file.
    pub hook_scripts: Vec<PathBuf>,
}
