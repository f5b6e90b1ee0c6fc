use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How the annotation front end renders a project's audio files.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "visualization_type"
)]
pub enum VisualizationType {
    #[sea_orm(string_value = "waveform")]
    Waveform,
    #[sea_orm(string_value = "spectrogram")]
    #[default]
    Spectrogram,
}

impl std::fmt::Display for VisualizationType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualizationType::Waveform => write!(fmt, "waveform"),
            VisualizationType::Spectrogram => write!(fmt, "spectrogram"),
        }
    }
}

impl std::str::FromStr for VisualizationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "waveform" => Ok(VisualizationType::Waveform),
            "spectrogram" => Ok(VisualizationType::Spectrogram),
            other => Err(format!("Unknown visualization type: {other}")),
        }
    }
}
