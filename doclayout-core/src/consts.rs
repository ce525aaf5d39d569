use crate::analysis::labels::Label;

/// The number of canonical document element classes.
///
/// This value is determined by the Label enum and matches the class count
/// of the YOLOX layout model used by the upstream layout engine.
pub const LABEL_SIZE: usize = Label::label_size();

/// Legacy or alternate element type names emitted by older model versions.
///
/// Each alias maps to exactly one canonical label. The resolver refuses to
/// start if an entry here collides with a canonical name or maps one alias
/// to two different labels.
pub const LEGACY_ALIASES: [(&str, Label); 4] = [
    ("NarrativeText", Label::Text),
    ("Image", Label::Picture),
    ("Header", Label::PageHeader),
    ("Footer", Label::PageFooter),
];

/// Stroke and label color for elements whose type could not be resolved.
///
/// Only used when unrecognized elements are flagged on the overlay.
pub const UNRECOGNIZED_COLOR: [u8; 3] = [128, 128, 128];

/// Width of the bounding box stroke in pixels.
pub const DEFAULT_BBOX_WIDTH: u32 = 2;

/// Font size of the overlay label text in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Vertical distance between the label baseline and the top edge of its box.
pub const DEFAULT_LABEL_OFFSET: i32 = 15;

/// Height of the placeholder box drawn for elements without coordinates.
pub const DEFAULT_FALLBACK_BOX_HEIGHT: u32 = 30;

/// Width of the placeholder box drawn for elements without coordinates.
pub const DEFAULT_FALLBACK_BOX_WIDTH: u32 = 200;

/// Left margin of the placeholder box column.
pub const FALLBACK_BOX_X: i32 = 10;

/// Timestamp format of a live log line.
pub const LOG_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Maximum number of lines kept by the live log.
pub const DEFAULT_MAX_LOG_LINES: usize = 1000;

/// Number of elements whose details are written to the live log.
pub const LOG_DETAIL_LIMIT: usize = 5;

/// Element text longer than this is truncated in the live log.
pub const LOG_TEXT_PREVIEW_CHARS: usize = 100;

/// OCR languages requested from the layout engine when nothing is configured.
pub const DEFAULT_LANGUAGES: [&str; 2] = ["jpn", "eng"];

/// Tesseract language codes accepted by the layout engine and their display names.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 14] = [
    ("jpn", "Japanese"),
    ("eng", "English"),
    ("chi_sim", "Chinese (Simplified)"),
    ("chi_tra", "Chinese (Traditional)"),
    ("kor", "Korean"),
    ("fra", "French"),
    ("deu", "German"),
    ("spa", "Spanish"),
    ("ita", "Italian"),
    ("rus", "Russian"),
    ("ara", "Arabic"),
    ("hin", "Hindi"),
    ("tha", "Thai"),
    ("vie", "Vietnamese"),
];

/// File name of the annotated image written by the CLI.
pub const ANNOTATED_IMAGE_NAME: &str = "annotated.png";

/// File name of the structured result written by the CLI.
pub const RESULT_JSON_NAME: &str = "layout.json";

/// File name of the live log written by the CLI.
pub const RUN_LOG_NAME: &str = "run.log";
