use thiserror::Error;

/// Failures surfaced by the pure engines. Rendering itself never fails; these
/// only come from decoding external assets and data.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("typeface asset is not valid JSON: {0}")]
    TypefaceJson(#[from] serde_json::Error),
    #[error("typeface outline for {glyph:?} has a bad token at {index}: {token:?}")]
    TypefaceOutline {
        glyph: char,
        index: usize,
        token: String,
    },
    #[error("skill data must be an object of category -> list, got {0}")]
    SkillData(String),
    #[error("glyph mesh for {0:?} has no area to sample")]
    EmptyMesh(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
