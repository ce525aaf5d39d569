use std::collections::VecDeque;

use chrono::Local;
use tracing::*;

use crate::{
    config::{LanguageInfo, LogConfig},
    consts::{LOG_DETAIL_LIMIT, LOG_TEXT_PREVIEW_CHARS, LOG_TIMESTAMP_FORMAT},
    layout::{element::DetectedElement, page::Page},
};

/// Timestamped run log shown to the user, bounded to the newest lines.
///
/// Every line is also emitted through `tracing`.
#[derive(Debug, Clone)]
pub struct RunLog {
    lines: VecDeque<String>,
    config: LogConfig,
}

impl RunLog {
    pub fn new(config: LogConfig) -> Self {
        Self {
            lines: VecDeque::new(),
            config,
        }
    }

    pub fn add<S: AsRef<str>>(&mut self, message: S) {
        let message = message.as_ref();
        info!(target: "run_log", "{message}");

        let timestamp = Local::now().format(LOG_TIMESTAMP_FORMAT);
        self.lines.push_back(format!("[{timestamp}] {message}"));
        while self.lines.len() > self.config.max_log_lines.max(1) {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The whole log, one line per entry.
    pub fn contents(&self) -> String {
        self.lines.iter().fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        })
    }

    pub fn record_languages(&mut self, info: &LanguageInfo) {
        self.add(format!(
            "languages: {} ({} languages)",
            info.names.join(", "),
            info.codes.len()
        ));
    }

    /// Element count, count per raw type, and details of the first elements.
    pub fn record_elements(&mut self, elements: &[DetectedElement]) {
        self.add(format!("analysis complete, {} elements detected", elements.len()));

        let mut per_type: Vec<(&str, usize)> = Vec::new();
        for element in elements {
            match per_type
                .iter()
                .position(|(raw, _)| *raw == element.element_type)
            {
                Some(pos) => per_type[pos].1 += 1,
                None => per_type.push((element.element_type.as_str(), 1)),
            }
        }
        for (raw, count) in per_type {
            self.add(format!("  - {raw}: {count}"));
        }

        if !self.config.log_element_details {
            return;
        }

        for element in elements.iter().take(LOG_DETAIL_LIMIT) {
            let detail = describe_element(element, self.config.log_coordinates);
            self.add(format!("element {}: {detail}", element.index + 1));
            if let Some(text) = &element.text {
                self.add(format!("  text: {}", preview(text)));
            }
        }
        if elements.len() > LOG_DETAIL_LIMIT {
            self.add(format!(
                "... {} more elements",
                elements.len() - LOG_DETAIL_LIMIT
            ));
        }
    }

    /// Resolution outcome: per-label counts and every unrecognized type.
    pub fn record_page(&mut self, page: &Page) {
        for (label, count) in &page.counts {
            self.add(format!("  {label}: {count}"));
        }
        for element in &page.unrecognized {
            self.add(format!(
                "unrecognized element type `{}` (element {}), not drawn as a layout label",
                element.raw_type,
                element.bbox_id + 1
            ));
        }
    }
}

fn describe_element(element: &DetectedElement, with_coordinates: bool) -> String {
    let coordinates = match (&element.bbox, with_coordinates) {
        (_, false) => String::new(),
        (None, true) => " - no coordinates".to_string(),
        (Some(_), true) if element.points.len() <= 4 => format!(" - points: {:?}", element.points),
        (Some(_), true) => format!(" - {} points", element.points.len()),
    };

    let proba = element
        .proba
        .map(|proba| format!(" {:.2}", proba))
        .unwrap_or_default();

    format!("{}{proba}{coordinates}", element.element_type)
}

fn preview(text: &str) -> String {
    if text.chars().count() > LOG_TEXT_PREVIEW_CHARS {
        let head = text.chars().take(LOG_TEXT_PREVIEW_CHARS).collect::<String>();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
