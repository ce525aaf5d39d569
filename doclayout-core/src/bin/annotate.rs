use std::{
    fs,
    path::{Path, PathBuf},
};

use ab_glyph::FontVec;
use anyhow::Context;
use clap::Parser;
use image::GenericImageView;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use doclayout_core::{
    config::{AppConfig, UnrecognizedStyle},
    consts::*,
    layout::page::Page,
    parser::{
        Task,
        elements::load_elements,
        log::RunLog,
        render::{RenderTask, load_font, save_image},
        resolve::{FailurePolicy, ResolveTask},
    },
    LabelResolver,
};

#[derive(Parser)]
#[command(name = "annotate")]
#[command(about = "Draw document layout analysis results over the analysed image")]
struct Args {
    #[arg(required_unless_present = "legend", help = "Input image the layout engine analysed")]
    image: Option<PathBuf>,

    #[arg(required_unless_present = "legend", help = "Element JSON exported by the layout engine")]
    elements: Option<PathBuf>,

    #[arg(short, long, default_value = "output", help = "Output directory")]
    output: PathBuf,

    #[arg(short, long, help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "TrueType font for label text, overrides the config")]
    font: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip, help = "Handling of unrecognized element types")]
    on_unknown: FailurePolicy,

    #[arg(long, value_enum, help = "Overlay style for unrecognized elements, overrides the config")]
    unrecognized: Option<UnrecognizedStyle>,

    #[arg(long, help = "Print the label legend and exit")]
    legend: bool,
}

/// Holds everything built once at startup.
struct Annotator {
    config: AppConfig,
    resolver: LabelResolver,
    font: Option<FontVec>,
}

impl Annotator {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(font) = &args.font {
            config.visualization.font_path = Some(font.clone());
        }
        if let Some(style) = args.unrecognized {
            config.visualization.unrecognized = style;
        }

        // an ambiguous label table must stop the process here
        let resolver = config.resolver()?;

        let font = config
            .visualization
            .font_path
            .as_ref()
            .map(load_font)
            .transpose()?;

        Ok(Self {
            config,
            resolver,
            font,
        })
    }

    fn annotate(
        &self,
        args: &Args,
        (image_path, elements_path): (&Path, &Path),
        log: &mut RunLog,
    ) -> anyhow::Result<Page> {
        let run_id = Uuid::new_v4();
        log.add(format!("starting layout annotation run {run_id}"));
        log.record_languages(&self.config.engine.language_info());

        let image = image::open(image_path)
            .with_context(|| format!("failed to open image {}", image_path.display()))?;
        let image_size = image.dimensions();
        log.add(format!("image {}x{}", image_size.0, image_size.1));

        let elements = load_elements(elements_path)?;
        log.record_elements(&elements);

        let page = ResolveTask {
            run_id,
            elements: &elements,
            image_size,
            policy: args.on_unknown,
        }
        .run(&self.resolver)?;
        log.record_page(&page);

        log.add("rendering annotated image");
        let canvas = RenderTask {
            page: &page,
            image: &image,
            config: &self.config.visualization,
        }
        .run(self.font.as_ref())?;

        fs::create_dir_all(&args.output)
            .with_context(|| format!("failed to create {}", args.output.display()))?;
        let annotated_path = args.output.join(ANNOTATED_IMAGE_NAME);
        save_image(&canvas, &annotated_path)?;

        let result_path = args.output.join(RESULT_JSON_NAME);
        write_json(&result_path, &page)?;

        log.add(format!(
            "annotation complete, wrote {} and {}",
            annotated_path.display(),
            result_path.display()
        ));
        Ok(page)
    }

    fn print_legend(&self) {
        println!("\n=== Layout Labels ===");
        for (resolved, description) in self.resolver.legend() {
            let [r, g, b] = resolved.color;
            println!(
                "  {:2}: {:14} {:12} rgb({r:3}, {g:3}, {b:3})  {description}",
                resolved.canonical_id,
                resolved.display_label,
                resolved.label.japanese_name(),
            );
        }
        println!("\nLegacy aliases:");
        for (alias, label) in LEGACY_ALIASES {
            println!("  {alias} -> {label}");
        }
    }
}

fn write_json(path: &Path, page: &Page) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(page)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let annotator = Annotator::new(&args)?;

    if args.legend {
        annotator.print_legend();
        return Ok(());
    }

    let (Some(image_path), Some(elements_path)) = (&args.image, &args.elements) else {
        anyhow::bail!("an image and an element file are required unless --legend is given");
    };

    let mut log = RunLog::new(annotator.config.log.clone());
    let outcome = annotator.annotate(&args, (image_path.as_path(), elements_path.as_path()), &mut log);
    if let Err(err) = &outcome {
        error!("annotation failed: {err:#}");
        log.add(format!("error: {err:#}"));
    }

    // the log is written whether or not the run succeeded
    let log_path = args.output.join(RUN_LOG_NAME);
    match fs::create_dir_all(&args.output) {
        Ok(()) => {
            fs::write(&log_path, log.contents())
                .with_context(|| format!("failed to write {}", log_path.display()))?;
            info!("run log written to {}", log_path.display());
        }
        Err(err) => error!(
            "run log not written, cannot create {}: {err}",
            args.output.display()
        ),
    }

    let page = outcome?;

    println!("\n=== Layout Annotation Summary ===");
    println!("Run: {}", page.run_id);
    println!("Image: {} ({}x{})", image_path.display(), page.width, page.height);
    println!("Elements: {}", page.total());
    println!("Resolved: {}", page.blocks.len());
    println!("Unrecognized: {}", page.unrecognized.len());

    if !page.counts.is_empty() {
        println!("\nDetected elements:");
        for (label, count) in &page.counts {
            println!("  - {label}: {count}");
        }
    }
    for element in &page.unrecognized {
        println!("  ! unrecognized `{}` (element {})", element.raw_type, element.bbox_id + 1);
    }

    Ok(())
}
