use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use yearwheel::config::{self, WheelConfig};
use yearwheel::{CairoSurface, WheelStructure, YearWheel};

const MIN_SIZE: u32 = 200;

#[derive(Parser, Debug)]
#[command(name = "wheelctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Render a wheel structure to PNG or SVG
    Render {
        /// Wheel structure JSON (rings, activityGroups, labels, items)
        structure: PathBuf,

        #[arg(short, long, default_value_t = 2025)]
        year: i32,

        /// Canvas edge length in pixels
        #[arg(short, long, default_value_t = 2000)]
        size: u32,

        #[arg(short, long, default_value = "wheel.png")]
        out: PathBuf,

        /// Write SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Title drawn in the centre above the year
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Print the clickable item regions of a wheel
    Regions {
        structure: PathBuf,

        #[arg(short, long, default_value_t = 2025)]
        year: i32,

        #[arg(short, long, default_value_t = 2000)]
        size: u32,

        /// One JSON object per region instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Write the default config file and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            structure,
            year,
            size,
            out,
            svg,
            title,
        } => render(&structure, year, size, &out, svg, title.as_deref()),
        Commands::Regions {
            structure,
            year,
            size,
            json,
        } => regions(&structure, year, size, json),
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn load_wheel(path: &Path, year: i32, size: u32) -> anyhow::Result<YearWheel> {
    if size < MIN_SIZE {
        anyhow::bail!("Canvas size must be at least {} pixels, got {}", MIN_SIZE, size);
    }
    if !(1..=9999).contains(&year) {
        anyhow::bail!("Year {} is out of range", year);
    }

    let structure = WheelStructure::from_path(path)?;
    let config: WheelConfig = config::load_or_default();
    log::info!(
        "Loaded {} rings and {} items from {}",
        structure.rings.len(),
        structure.items.len(),
        path.display()
    );
    Ok(YearWheel::new(structure, year, size as f64, config))
}

fn render(
    path: &Path,
    year: i32,
    size: u32,
    out: &Path,
    svg: bool,
    title: Option<&str>,
) -> anyhow::Result<()> {
    let mut wheel = load_wheel(path, year, size)?;

    if svg {
        let mut surface = CairoSurface::svg(size as f64, out)?;
        wheel.render(&mut surface, title)?;
        surface.finish()?;
    } else {
        let mut surface = CairoSurface::raster(size as i32)?;
        wheel.render(&mut surface, title)?;
        surface.write_png(out)?;
    }

    log::info!(
        "Wrote {} with {} items to {}",
        if svg { "SVG" } else { "PNG" },
        wheel.clickable_items().len(),
        out.display()
    );
    Ok(())
}

fn regions(path: &Path, year: i32, size: u32, json: bool) -> anyhow::Result<()> {
    let wheel = load_wheel(path, year, size)?;

    for region in wheel.clickable_items() {
        if json {
            let line = serde_json::json!({
                "itemId": region.item_id.to_string(),
                "ringId": region.ring_id.to_string(),
                "startRadius": region.start_radius,
                "endRadius": region.end_radius,
                "startAngle": region.start_angle,
                "endAngle": region.end_angle,
            });
            println!("{}", line);
        } else {
            println!(
                "{}\t{}\t{:.1}..{:.1}\t{:.2}..{:.2}deg",
                region.item_id,
                region.ring_id,
                region.start_radius,
                region.end_radius,
                region.start_angle.to_degrees(),
                region.end_angle.to_degrees()
            );
        }
    }
    Ok(())
}
