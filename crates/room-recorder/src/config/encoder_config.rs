use crate::config::{default_encoder_program, default_post_input, default_pre_input};

use serde::{Deserialize, Serialize};

/// Encoder used to convert raw recordings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Encoder program.
    #[serde(default = "default_encoder_program")]
    pub program: String,
    /// Arguments before `-i <raw>`, split on whitespace.
    #[serde(default = "default_pre_input")]
    pub pre_input: String,
    /// Arguments after `-i <raw>`, split on whitespace.
    #[serde(default = "default_post_input")]
    pub post_input: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: default_encoder_program(),
            pre_input: default_pre_input(),
            post_input: default_post_input(),
        }
    }
}
