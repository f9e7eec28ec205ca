// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

use serde::{Deserialize, Serialize};

/// Used only for `config` subcommand to show all config.
/// Commands deserialize just the section they need (DisplaySection /
/// ViewerSection below); every field has a default, so running with no
/// config file at all is fine.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CompleteAppConfig {
    pub display: DisplayConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewerSection {
    pub viewer: ViewerConfig,
}

/// Report defaults used when the CLI flags aren't given.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Material token to highlight, e.g. "18k-gold".
    pub material: Option<String>,
    /// Unit system token: "metric", "troy", or "both".
    pub units: Option<String>,
}

/// Settings for the `launch` subcommand.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Interpreter to use instead of probing python3/python on PATH.
    pub python: Option<String>,
    /// Virtual environment directory, created on first launch.
    pub venv_dir: String,
    /// Requirements manifest installed into the venv. Contents are opaque to
    /// assay; errors in it surface from pip.
    pub requirements: String,
    /// Streamlit app entry file.
    pub app: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            python: None,
            venv_dir: "venv".to_string(),
            requirements: "requirements.txt".to_string(),
            app: "app.py".to_string(),
        }
    }
}
