use snafu::prelude::*;

/// Failures of the label table and of label resolution.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum LabelError {
    #[snafu(display("Unrecognized element type `{}`", raw))]
    Unrecognized { raw: String },
    #[snafu(display("Label index {} is out of range 0..{}", idx, size))]
    UnknownIndex { idx: usize, size: usize },
    #[snafu(display("Alias `{}` conflicts: {}", alias, reason))]
    AliasConflict { alias: String, reason: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DoclayoutError {
    #[snafu(display("Label error at stage `{}`: {}", stage, source))]
    Label { source: LabelError, stage: String },
    #[snafu(display("Load Font `{}` error: {}", path, source))]
    Font {
        source: ab_glyph::InvalidFont,
        path: String,
    },
    #[snafu(display("Image Read `{}` error: {}", path, source))]
    ImageRead {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Image Write `{}` error: {}", path, source))]
    ImageWrite {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Write `{}` error: {}", path, source))]
    IoWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Json `{}` error at `{}`: {}", stage, path, source))]
    Json {
        source: serde_json::Error,
        stage: String,
        path: String,
    },
    #[snafu(display("Config error for `{}`: {}", key, message))]
    Config { key: String, message: String },
}
