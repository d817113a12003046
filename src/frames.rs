use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::imageops::FilterType;
use image::RgbaImage;

use preygrid::config::PLOT_WINDOW;
use preygrid::visual;
use preygrid::Simulation;

const MAP_SCALE: u32 = 8;
const PLOT_WIDTH: usize = 640;
const PLOT_HEIGHT: usize = 360;

/// Per-tick PNG export: `map/frame-NNN.png` and `plot/frame-NNN.png`.
pub struct FrameWriter {
    map_dir: PathBuf,
    plot_dir: PathBuf,
}

impl FrameWriter {
    pub fn create(root: &Path) -> anyhow::Result<Self> {
        let map_dir = root.join("map");
        let plot_dir = root.join("plot");
        for dir in [&map_dir, &plot_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(Self { map_dir, plot_dir })
    }

    /// Write the grid and the population plot as they stand before the
    /// current tick runs.
    pub fn write(&self, sim: &Simulation) -> anyhow::Result<()> {
        let name = format!("frame-{:03}.png", sim.tick_count());
        let topology = sim.store().topology();

        let map = to_image(
            visual::grid_pixels(sim.store(), sim.graph()),
            topology.width(),
            topology.height(),
        )?;
        let map = image::imageops::resize(
            &map,
            map.width() * MAP_SCALE,
            map.height() * MAP_SCALE,
            FilterType::Nearest,
        );
        let map_path = self.map_dir.join(&name);
        map.save(&map_path)
            .with_context(|| format!("failed to write {}", map_path.display()))?;

        let plot = to_image(
            visual::plot_pixels(sim.history(), sim.graph(), PLOT_WIDTH, PLOT_HEIGHT, PLOT_WINDOW),
            PLOT_WIDTH,
            PLOT_HEIGHT,
        )?;
        let plot_path = self.plot_dir.join(&name);
        plot.save(&plot_path)
            .with_context(|| format!("failed to write {}", plot_path.display()))?;
        Ok(())
    }
}

fn to_image(pixels: Vec<[u8; 4]>, width: usize, height: usize) -> anyhow::Result<RgbaImage> {
    let bytes: Vec<u8> = pixels.into_iter().flatten().collect();
    RgbaImage::from_raw(width as u32, height as u32, bytes)
        .context("pixel buffer does not match the image size")
}
