//! Atlas dump tool
//!
//! Rasterizes a font the way the game does, writes the packed atlas as a PNG
//! and prints per-glyph metrics. Optionally measures a sample string with the
//! same layout rules the UI uses.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use text_engine::foundation::logging;
use text_engine::render::backends::RecordingBackend;
use text_engine::render::text::{
    atlas_packer, rasterize_repertoire, text_layout, CodePoint, FontResource, FontdueRasterizer,
};
use text_engine::{Config, TextConfig};

const DEFAULT_OUTPUT: &str = "atlas.png";

#[derive(Debug)]
struct DumpOptions {
    font: PathBuf,
    height: Option<u32>,
    config: Option<PathBuf>,
    output: PathBuf,
    sample: Option<String>,
    wrap: Option<u32>,
    require_pot: bool,
    list_glyphs: bool,
}

fn parse_args() -> Result<DumpOptions> {
    let matches = Command::new("atlas_dump")
        .about("Builds a UI font atlas and writes it to a PNG")
        .arg(
            Arg::new("font")
                .value_name("FONT")
                .help("TrueType/OpenType font file")
                .required(true),
        )
        .arg(
            Arg::new("height")
                .short('s')
                .long("height")
                .value_name("PIXELS")
                .help("Font height before UI scaling (defaults to the config's default font height)")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Text configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the atlas PNG")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            Arg::new("measure")
                .short('m')
                .long("measure")
                .value_name("TEXT")
                .help("Measure a sample string with the built font"),
        )
        .arg(
            Arg::new("wrap")
                .short('w')
                .long("wrap")
                .value_name("PIXELS")
                .help("Also wrap the sample to this width")
                .value_parser(clap::value_parser!(u32))
                .requires("measure"),
        )
        .arg(
            Arg::new("pot")
                .long("pot")
                .help("Force power-of-two atlas dimensions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("glyphs")
                .short('g')
                .long("glyphs")
                .help("Print metrics for every glyph")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let Some(font) = matches.get_one::<String>("font") else {
        bail!("a font file is required");
    };

    Ok(DumpOptions {
        font: PathBuf::from(font),
        height: matches.get_one::<u32>("height").copied(),
        config: matches.get_one::<String>("config").map(PathBuf::from),
        output: matches
            .get_one::<String>("output")
            .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from),
        sample: matches.get_one::<String>("measure").cloned(),
        wrap: matches.get_one::<u32>("wrap").copied(),
        require_pot: matches.get_flag("pot"),
        list_glyphs: matches.get_flag("glyphs"),
    })
}

fn load_config(options: &DumpOptions) -> Result<TextConfig> {
    let mut config = match &options.config {
        Some(path) => TextConfig::load_from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TextConfig::default(),
    };

    if options.require_pot {
        config = config.with_pot(true);
    }
    config.validate().context("Invalid text configuration")?;
    Ok(config)
}

fn print_glyphs(atlas: &atlas_packer::PackedAtlas) {
    println!("{:>5} {:>4} {:>9} {:>7} {:>9}", "code", "char", "advance", "origin", "ink");
    for code_point in CodePoint::all() {
        let ch = char::from(code_point);
        let label = if ch.is_ascii_graphic() { ch.to_string() } else { String::from("-") };
        let metrics = atlas.metrics[code_point.index()];
        let placement = &atlas.placements[code_point.index()];
        let quad = &atlas.quads[code_point.index()];
        let ink = (quad.vertices[2] - quad.vertices[0], quad.vertices[1] - quad.vertices[5]);

        println!(
            "{:>5} {:>4} {:>9} {:>7} {:>9}",
            code_point.byte(),
            label,
            format!("{},{}", metrics.advance_x, metrics.advance_y),
            format!("{},{}", placement.x, placement.y),
            format!("{}x{}", ink.0, ink.1),
        );
    }
}

fn report_sample(font: &FontResource, sample: &str, wrap: Option<u32>) -> Result<()> {
    println!("Sample {:?}", sample);
    println!("  width: {}px", text_layout::measure_width(font, sample)?);

    let Some(width) = wrap else {
        return Ok(());
    };

    let (fits, _) = text_layout::fit_width(font, sample, width)?;
    let (_, offset) = text_layout::center_offset(font, sample, width)?;
    println!("  fits in {}px: {} bytes (centered at +{:.1})", width, fits, offset);
    println!("  block height: {}px", text_layout::block_height(font, sample, width)?);

    let mut pos = 0;
    loop {
        let line = text_layout::break_line(font, &sample[pos..], width)?;
        println!("  | {}", &sample[pos..pos + line.end]);
        match line.next {
            Some(next) => pos += next,
            None => break,
        }
    }
    Ok(())
}

fn measure_sample(
    rasterizer: &FontdueRasterizer,
    config: &TextConfig,
    height: u32,
    sample: &str,
    wrap: Option<u32>,
) -> Result<()> {
    let mut backend = RecordingBackend::new();
    let mut font = FontResource::build_with(&mut backend, rasterizer, height, &config.build_options())?;

    let result = report_sample(&font, sample, wrap);
    font.destroy(&mut backend);
    result
}

fn main() -> Result<()> {
    logging::init();
    let options = parse_args()?;
    let config = load_config(&options)?;

    let font_data =
        std::fs::read(&options.font).with_context(|| format!("Failed to read font {}", options.font.display()))?;
    let rasterizer = FontdueRasterizer::from_bytes(&font_data)?;

    let height = options.height.unwrap_or(config.default_font_height);
    let build_options = config.build_options();
    let line_height = build_options.line_height(height);
    if line_height == 0 {
        bail!("Height {} at scale {} is zero pixels", height, config.ui_scale);
    }

    let glyphs = rasterize_repertoire(&rasterizer, line_height as f32)?;
    let atlas = atlas_packer::pack(&glyphs, &build_options.pack_options())?;

    println!(
        "{}: {}px line height, {}x{} atlas",
        options.font.display(),
        line_height,
        atlas.image.width,
        atlas.image.height
    );
    if options.list_glyphs {
        print_glyphs(&atlas);
    }

    atlas
        .image
        .save_png(&options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;

    if let Some(sample) = &options.sample {
        measure_sample(&rasterizer, &config, height, sample, options.wrap)?;
    }

    Ok(())
}
