use std::{borrow::Cow, fs, path::Path, time::Instant};

use ab_glyph::{FontVec, PxScale};
use glam::Vec2;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut},
    rect::Rect,
};
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::bbox::Bbox,
    config::{UnrecognizedStyle, VisualizationConfig},
    consts::{FALLBACK_BOX_X, UNRECOGNIZED_COLOR},
    error::*,
    layout::page::Page,
};

use super::Task;

/// Draws a page's layouts over the image they were detected on.
pub struct RenderTask<'p> {
    pub page: &'p Page,
    pub image: &'p DynamicImage,
    pub config: &'p VisualizationConfig,
}

/// One box to draw, resolved or flagged.
struct Mark<'t> {
    bbox_id: usize,
    points: &'t [[f32; 2]],
    bbox: Option<Bbox>,
    color: [u8; 3],
    text: Cow<'t, str>,
}

pub fn load_font<P: AsRef<Path>>(path: P) -> Result<FontVec, DoclayoutError> {
    let path = path.as_ref();
    let data = fs::read(path).context(IoReadSnafu {
        path: path.to_string_lossy(),
    })?;

    FontVec::try_from_vec(data).context(FontSnafu {
        path: path.to_string_lossy(),
    })
}

pub fn save_image<P: AsRef<Path>>(image: &RgbImage, output: P) -> Result<(), DoclayoutError> {
    image.save(output.as_ref()).context(ImageWriteSnafu {
        path: output.as_ref().to_string_lossy(),
    })
}

impl<'a> Task<'a> for RenderTask<'_> {
    type Output = RgbImage;

    type Extra = Option<&'a FontVec>;

    #[instrument(skip_all, fields(run = %self.page.run_id))]
    fn run(&self, font: Self::Extra) -> Result<Self::Output, DoclayoutError> {
        let start = Instant::now();
        let mut canvas = self.image.to_rgb8();
        if font.is_none() {
            debug!("no font configured, drawing boxes without labels");
        }

        let mut marks = self
            .page
            .blocks
            .iter()
            .map(|layout| Mark {
                bbox_id: layout.bbox_id,
                points: &layout.points,
                bbox: layout.bbox,
                color: layout.color,
                text: Cow::Borrowed(layout.display_label),
            })
            .collect::<Vec<_>>();
        if self.config.unrecognized == UnrecognizedStyle::Flag {
            marks.extend(self.page.unrecognized.iter().map(|element| Mark {
                bbox_id: element.bbox_id,
                points: &element.points,
                bbox: element.bbox,
                color: UNRECOGNIZED_COLOR,
                text: Cow::Owned(format!("? {}", element.raw_type)),
            }));
        }

        for mark in &marks {
            match mark.bbox {
                Some(bbox) => self.draw_located(&mut canvas, font, mark, bbox),
                None => self.draw_fallback(&mut canvas, font, mark),
            }
        }

        info!(
            "rendered {} marks in {}ms",
            marks.len(),
            start.elapsed().as_millis()
        );
        Ok(canvas)
    }
}

impl RenderTask<'_> {
    fn draw_located(&self, canvas: &mut RgbImage, font: Option<&FontVec>, mark: &Mark, bbox: Bbox) {
        let (width, height) = canvas.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let bounds = Vec2::new((width - 1) as f32, (height - 1) as f32);
        if !bbox.intersects(Vec2::ZERO, bounds) {
            warn!(
                "element {} lies outside the {width}x{height} image, not drawn",
                mark.bbox_id
            );
            return;
        }
        if bbox.is_degenerate() {
            debug!("element {} has no area, drawn as a line", mark.bbox_id);
        }

        let visible = bbox.clamp(Vec2::ZERO, bounds);
        let x = visible.min.x as i32;
        let y = visible.min.y as i32;

        if is_skewed(mark.points, &bbox) {
            draw_outline(canvas, mark.points, mark.color, self.config.bbox_width);
        } else {
            // both edges are inclusive
            let box_width = (visible.max.x as i32 - x + 1).max(1) as u32;
            let box_height = (visible.max.y as i32 - y + 1).max(1) as u32;
            draw_box(
                canvas,
                (x, y),
                (box_width, box_height),
                mark.color,
                self.config.bbox_width,
            );
        }

        if let Some(font) = font {
            let text_x = x.max(0);
            let text_y = (y - self.config.label_offset).max(0);
            self.draw_label(canvas, font, (text_x, text_y), mark.color, &mark.text);
        }
    }

    /// Stacks elements without coordinates down the left edge.
    fn draw_fallback(&self, canvas: &mut RgbImage, font: Option<&FontVec>, mark: &Mark) {
        let box_height = self.config.fallback_box_height;
        let box_width = self.config.fallback_box_width;
        if box_height == 0 || box_width == 0 {
            return;
        }

        let span = canvas.height().saturating_sub(box_height);
        let y = if span == 0 {
            0
        } else {
            ((mark.bbox_id as u64 * box_height as u64) % span as u64) as i32
        };

        draw_box(
            canvas,
            (FALLBACK_BOX_X, y),
            (box_width, box_height),
            mark.color,
            self.config.bbox_width,
        );

        if let Some(font) = font {
            let text = format!("{} {}", mark.text, mark.bbox_id + 1);
            self.draw_label(canvas, font, (FALLBACK_BOX_X + 5, y + 5), mark.color, &text);
        }
    }

    fn draw_label(
        &self,
        canvas: &mut RgbImage,
        font: &FontVec,
        (x, y): (i32, i32),
        color: [u8; 3],
        text: &str,
    ) {
        let scale = PxScale::from(self.config.font_size);
        draw_text_mut(canvas, Rgb(color), x, y, scale, font, text);
    }
}

/// Hollow rectangle grown outward one pixel per unit of thickness.
fn draw_box(
    canvas: &mut RgbImage,
    (x, y): (i32, i32),
    (width, height): (u32, u32),
    color: [u8; 3],
    thickness: u32,
) {
    let color = Rgb(color);
    for offset in 0..thickness.max(1) {
        let rect = Rect::at(x - offset as i32, y - offset as i32)
            .of_size(width + offset * 2, height + offset * 2);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

/// True for polygons that are not just the four corners of their envelope.
fn is_skewed(points: &[[f32; 2]], bbox: &Bbox) -> bool {
    points.len() >= 4
        && !(points.len() == 4
            && points.iter().all(|[x, y]| {
                (*x == bbox.min.x || *x == bbox.max.x) && (*y == bbox.min.y || *y == bbox.max.y)
            }))
}

/// Closed polyline through the points, thickened toward +x and +y.
fn draw_outline(canvas: &mut RgbImage, points: &[[f32; 2]], color: [u8; 3], thickness: u32) {
    let color = Rgb(color);
    for (i, [x1, y1]) in points.iter().copied().enumerate() {
        let [x2, y2] = points[(i + 1) % points.len()];
        for offset in 0..thickness.max(1) {
            let offset = offset as f32;
            draw_line_segment_mut(canvas, (x1 + offset, y1), (x2 + offset, y2), color);
            draw_line_segment_mut(canvas, (x1, y1 + offset), (x2, y2 + offset), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::{
        analysis::{labels::Label, resolver::LabelResolver},
        config::VisualizationConfigBuilder,
        layout::element::DetectedElement,
        parser::resolve::{FailurePolicy, ResolveTask},
    };

    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn element(index: usize, element_type: &str, points: Vec<[f32; 2]>) -> DetectedElement {
        DetectedElement {
            index,
            element_id: None,
            element_type: element_type.to_string(),
            bbox: Bbox::from_points(&points),
            points,
            proba: None,
            text: None,
        }
    }

    fn page(elements: &[DetectedElement]) -> Page {
        ResolveTask {
            run_id: Uuid::new_v4(),
            elements,
            image_size: (200, 120),
            policy: FailurePolicy::Skip,
        }
        .run(LabelResolver::global().unwrap())
        .unwrap()
    }

    fn blank() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 120, WHITE))
    }

    #[test]
    fn test_render_draws_resolved_color() {
        let elements = vec![
            element(0, "Title", vec![[20.0, 30.0], [20.0, 60.0], [120.0, 60.0], [120.0, 30.0]]),
            element(1, "NarrativeText", vec![[20.0, 80.0], [150.0, 100.0]]),
        ];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfig::default();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        assert_eq!(canvas.dimensions(), (200, 120));
        // box edges, including the outer thickness ring
        assert_eq!(*canvas.get_pixel(20, 30), Rgb([255, 69, 0]));
        assert_eq!(*canvas.get_pixel(19, 29), Rgb([255, 69, 0]));
        assert_eq!(*canvas.get_pixel(70, 60), Rgb([255, 69, 0]));
        assert_eq!(*canvas.get_pixel(20, 80), Rgb([0, 255, 0]));
        // interior untouched
        assert_eq!(*canvas.get_pixel(70, 45), WHITE);
        // source image untouched
        assert_eq!(image.to_rgb8().get_pixel(20, 30), &WHITE);
    }

    #[test]
    fn test_render_omits_unrecognized_by_default() {
        let elements = vec![element(0, "Mystery", vec![[10.0, 10.0], [50.0, 50.0]])];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfig::default();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        assert!(canvas.pixels().all(|pixel| *pixel == WHITE));
    }

    #[test]
    fn test_render_flags_unrecognized_in_neutral_color() {
        let elements = vec![element(0, "Mystery", vec![[10.0, 10.0], [50.0, 50.0]])];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfigBuilder::default()
            .unrecognized(UnrecognizedStyle::Flag)
            .build()
            .unwrap();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        assert_eq!(*canvas.get_pixel(10, 10), Rgb(UNRECOGNIZED_COLOR));
    }

    #[test]
    fn test_render_fallback_placement() {
        let elements = vec![
            element(0, "Table", Vec::new()),
            element(1, "Caption", Vec::new()),
        ];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfigBuilder::default()
            .bbox_width(1u32)
            .fallback_box_width(50u32)
            .build()
            .unwrap();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        // first box at y = 0, second at y = 30
        assert_eq!(*canvas.get_pixel(10, 0), Rgb(Label::Table.color()));
        assert_eq!(*canvas.get_pixel(10, 30), Rgb(Label::Caption.color()));
        assert_eq!(*canvas.get_pixel(59, 45), Rgb(Label::Caption.color()));
    }

    #[test]
    fn test_render_clamps_boxes_outside_image() {
        let elements = vec![
            element(0, "Picture", vec![[-20.0, -20.0], [300.0, 300.0]]),
            element(1, "Formula", vec![[500.0, 500.0], [600.0, 600.0]]),
        ];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfig::default();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 0, 255]));
        assert_eq!(*canvas.get_pixel(199, 119), Rgb([255, 0, 255]));
        assert!(canvas.pixels().all(|pixel| *pixel != Rgb([128, 0, 128])));
    }

    #[test]
    fn test_render_box_includes_max_corner() {
        let elements = vec![element(0, "Table", vec![[20.0, 30.0], [120.0, 60.0]])];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfigBuilder::default()
            .bbox_width(1u32)
            .build()
            .unwrap();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        let table = Rgb(Label::Table.color());
        assert_eq!(*canvas.get_pixel(120, 45), table);
        assert_eq!(*canvas.get_pixel(70, 60), table);
        assert_eq!(*canvas.get_pixel(120, 60), table);
        assert_eq!(*canvas.get_pixel(119, 45), WHITE);
        assert_eq!(*canvas.get_pixel(121, 45), WHITE);
        assert_eq!(*canvas.get_pixel(70, 61), WHITE);
    }

    #[test]
    fn test_render_zero_height_element_as_line() {
        let elements = vec![element(0, "Text", vec![[20.0, 50.0], [120.0, 50.0]])];
        let page = page(&elements);
        assert_eq!(page.blocks.len(), 1);
        let image = blank();
        let config = VisualizationConfigBuilder::default()
            .bbox_width(1u32)
            .build()
            .unwrap();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        let text = Rgb(Label::Text.color());
        assert_eq!(*canvas.get_pixel(20, 50), text);
        assert_eq!(*canvas.get_pixel(70, 50), text);
        assert_eq!(*canvas.get_pixel(120, 50), text);
        assert_eq!(*canvas.get_pixel(70, 49), WHITE);
        assert_eq!(*canvas.get_pixel(70, 51), WHITE);
    }

    #[test]
    fn test_render_skewed_polygon_outline() {
        let diamond = vec![[100.0, 20.0], [140.0, 60.0], [100.0, 100.0], [60.0, 60.0]];
        let elements = vec![element(0, "Title", diamond)];
        let page = page(&elements);
        let image = blank();
        let config = VisualizationConfigBuilder::default()
            .bbox_width(1u32)
            .build()
            .unwrap();

        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        let title = Rgb(Label::Title.color());
        assert_eq!(*canvas.get_pixel(100, 20), title);
        assert_eq!(*canvas.get_pixel(120, 40), title);
        assert_eq!(*canvas.get_pixel(80, 80), title);
        // envelope corners and centre stay clear
        assert_eq!(*canvas.get_pixel(60, 20), WHITE);
        assert_eq!(*canvas.get_pixel(140, 100), WHITE);
        assert_eq!(*canvas.get_pixel(100, 60), WHITE);
    }

    #[test]
    fn test_axis_aligned_corners_are_not_skewed() {
        let corners = [[20.0, 30.0], [20.0, 60.0], [120.0, 60.0], [120.0, 30.0]];
        let bbox = Bbox::from_points(&corners).unwrap();
        assert!(!is_skewed(&corners, &bbox));

        let diamond = [[100.0, 20.0], [140.0, 60.0], [100.0, 100.0], [60.0, 60.0]];
        let bbox = Bbox::from_points(&diamond).unwrap();
        assert!(is_skewed(&diamond, &bbox));
        assert!(!is_skewed(&diamond[..2], &bbox));
    }

    #[test]
    fn test_load_font_errors() {
        let err = load_font("does/not/exist.ttf").unwrap_err();
        assert!(matches!(err, DoclayoutError::IoRead { .. }));
    }
}
