use crate::error::DoclayoutError;

pub mod elements;
pub mod log;
pub mod render;
pub mod resolve;

pub trait Task<'a> {
    type Output;
    type Extra: 'a;

    fn run(&self, extra: Self::Extra) -> Result<Self::Output, DoclayoutError>;
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb, RgbImage};
    use uuid::Uuid;

    use crate::{
        analysis::{labels::Label, resolver::LabelResolver},
        config::VisualizationConfig,
        parser::{
            elements::decode_elements,
            render::RenderTask,
            resolve::{FailurePolicy, ResolveTask},
        },
    };

    use super::*;

    const ENGINE_OUTPUT: &str = r#"[
        { "type": "Title", "text": "Report",
          "metadata": { "coordinates": { "points": [[10, 10], [10, 30], [150, 30], [150, 10]], "system": "PixelSpace" } } },
        { "type": "NarrativeText", "text": "Body",
          "metadata": { "coordinates": { "points": [[10, 40], [10, 80], [190, 80], [190, 40]], "system": "PixelSpace" } } },
        { "type": "Table",
          "metadata": { "coordinates": { "points": [[10, 90], [10, 110], [190, 110], [190, 90]], "system": "PixelSpace" } } },
        { "type": "Unknown",
          "metadata": { "coordinates": { "points": [[160, 5], [195, 35]], "system": "PixelSpace" } } }
    ]"#;

    #[test]
    fn test_engine_output_to_overlay() {
        let elements = decode_elements(ENGINE_OUTPUT, "inline").unwrap();
        let page = ResolveTask {
            run_id: Uuid::new_v4(),
            elements: &elements,
            image_size: (200, 120),
            policy: FailurePolicy::Skip,
        }
        .run(LabelResolver::global().unwrap())
        .unwrap();

        let resolved = page
            .blocks
            .iter()
            .map(|layout| (layout.raw_type.as_str(), layout.canonical_id, layout.display_label))
            .collect::<Vec<_>>();
        assert_eq!(
            resolved,
            vec![
                ("Title", 10, "Title"),
                ("NarrativeText", 9, "Text"),
                ("Table", 8, "Table")
            ]
        );
        assert_eq!(page.unrecognized.len(), 1);
        assert_eq!(page.unrecognized[0].raw_type, "Unknown");

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 120, Rgb([255, 255, 255])));
        let config = VisualizationConfig::default();
        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &config,
        }
        .run(None)
        .unwrap();

        assert_eq!(*canvas.get_pixel(10, 10), Rgb(Label::Title.color()));
        assert_eq!(*canvas.get_pixel(10, 40), Rgb(Label::Text.color()));
        assert_eq!(*canvas.get_pixel(10, 90), Rgb(Label::Table.color()));
        // the unrecognized element is not drawn under any label
        assert_eq!(*canvas.get_pixel(175, 20), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(160, 5), Rgb([255, 255, 255]));
    }
}
