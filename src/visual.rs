// Colouring of the occupancy grid. Pure functions over count snapshots; the
// viewer turns the result into a texture.

use crate::species::SpeciesGraph;
use crate::stats::PopulationHistory;
use crate::store::{CountGrid, PopulationStore};

const PLOT_LINE_WIDTH: i64 = 3;

/// Alpha for an occupied cell: `(1 - e^(-6 * share)) * 100 + 155`, where
/// `share` is the cell's total over the busiest cell's total.
pub fn occupancy_alpha(cell_total: u32, max_cell_total: u32) -> u8 {
    if cell_total == 0 || max_cell_total == 0 {
        return 0;
    }
    let share = cell_total as f64 / max_cell_total as f64;
    let alpha = (1.0 - (-6.0 * share).exp()) * 100.0 + 155.0;
    alpha.round().clamp(0.0, 255.0) as u8
}

/// Type colours blended by each type's share of the cell.
pub fn blend_color(counts: &[u32], graph: &SpeciesGraph) -> [u8; 3] {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return [0, 0, 0];
    }
    let mut rgb = [0.0f64; 3];
    for (id, &count) in graph.ids().zip(counts) {
        let share = count as f64 / total as f64;
        let color = graph.species(id).color;
        for (channel, &c) in rgb.iter_mut().zip(&color) {
            *channel += c as f64 * share;
        }
    }
    rgb.map(|c| c.round().clamp(0.0, 255.0) as u8)
}

/// RGBA for one cell. Empty cells are fully transparent.
pub fn cell_rgba(counts: &[u32], graph: &SpeciesGraph, max_cell_total: u32) -> [u8; 4] {
    let total: u32 = counts.iter().sum();
    let [r, g, b] = blend_color(counts, graph);
    [r, g, b, occupancy_alpha(total, max_cell_total)]
}

/// Row-major RGBA pixels, one per rectangle cell; cells outside the mask stay
/// transparent.
pub fn grid_pixels(store: &PopulationStore, graph: &SpeciesGraph) -> Vec<[u8; 4]> {
    let topology = store.topology();
    let counts: CountGrid = store.counts_by_position_and_type();
    let max_total = (0..topology.len())
        .map(|cell| counts.cell_total(cell))
        .max()
        .unwrap_or(0);

    let mut pixels = vec![[0u8; 4]; topology.height() * topology.width()];
    for (cell, pos) in topology.valid_cells().iter().enumerate() {
        let flat = pos.row as usize * topology.width() + pos.col as usize;
        pixels[flat] = cell_rgba(counts.cell_counts(cell), graph, max_total);
    }
    pixels
}

/// Row-major RGBA line plot of the last `window` samples of every type on a
/// transparent background. The y axis runs from 0 to the largest sample shown.
pub fn plot_pixels(
    history: &PopulationHistory,
    graph: &SpeciesGraph,
    width: usize,
    height: usize,
    window: usize,
) -> Vec<[u8; 4]> {
    let mut pixels = vec![[0u8; 4]; width * height];
    if width == 0 || height == 0 {
        return pixels;
    }
    let max = graph
        .ids()
        .flat_map(|id| history.recent(id, window).iter().copied())
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    for id in graph.ids() {
        let samples = history.recent(id, window);
        let [r, g, b] = graph.species(id).color;
        let color = [r, g, b, 255];
        let points: Vec<(f64, f64)> = samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = if samples.len() > 1 {
                    i as f64 / (samples.len() - 1) as f64 * (width - 1) as f64
                } else {
                    0.0
                };
                let y = (height - 1) as f64 * (1.0 - v as f64 / max);
                (x, y)
            })
            .collect();

        match points.as_slice() {
            [] => {}
            [only] => stamp(&mut pixels, width, height, *only, color),
            _ => {
                for pair in points.windows(2) {
                    draw_segment(&mut pixels, width, height, pair[0], pair[1], color);
                }
            }
        }
    }
    pixels
}

fn draw_segment(
    pixels: &mut [[u8; 4]],
    width: usize,
    height: usize,
    from: (f64, f64),
    to: (f64, f64),
    color: [u8; 4],
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        stamp(pixels, width, height, (from.0 + dx * t, from.1 + dy * t), color);
    }
}

fn stamp(pixels: &mut [[u8; 4]], width: usize, height: usize, at: (f64, f64), color: [u8; 4]) {
    let half = PLOT_LINE_WIDTH / 2;
    let (cx, cy) = (at.0.round() as i64, at.1.round() as i64);
    for y in cy - half..=cy + half {
        for x in cx - half..=cx + half {
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                pixels[y as usize * width + x as usize] = color;
            }
        }
    }
}

/// `#RRGGBB` for plot legends.
pub fn hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{GridTopology, Position};

    fn red_blue() -> SpeciesGraph {
        let mut graph = SpeciesGraph::new();
        graph.add_species("Red", [255, 0, 0]);
        graph.add_species("Blue", [0, 0, 255]);
        graph
    }

    #[test]
    fn blend_follows_type_shares() {
        let graph = red_blue();
        assert_eq!(blend_color(&[6, 3], &graph), [170, 0, 85]);
        assert_eq!(blend_color(&[1, 0], &graph), [255, 0, 0]);
        assert_eq!(blend_color(&[0, 0], &graph), [0, 0, 0]);
    }

    #[test]
    fn alpha_rises_with_occupancy_and_guards_zero() {
        assert_eq!(occupancy_alpha(0, 10), 0);
        assert_eq!(occupancy_alpha(3, 0), 0);
        let full = occupancy_alpha(10, 10);
        let sparse = occupancy_alpha(1, 10);
        assert!(sparse >= 155 && sparse < full);
        assert_eq!(full, 255);
    }

    #[test]
    fn grid_pixels_cover_the_rectangle() {
        let graph = red_blue();
        let mut store = PopulationStore::new(GridTopology::circle(6, 6), graph.len());
        store.add(crate::species::SpeciesId(0), Position::new(3, 3));
        let pixels = grid_pixels(&store, &graph);
        assert_eq!(pixels.len(), 36);
        assert_eq!(pixels[3 * 6 + 3], [255, 0, 0, 255]);
        // Outside the mask.
        assert_eq!(pixels[0], [0, 0, 0, 0]);
    }

    #[test]
    fn plot_scales_series_to_the_largest_sample() {
        let graph = red_blue();
        let mut history = PopulationHistory::new(2);
        for _ in 0..5 {
            history.record(&[10, 0]);
        }
        let (w, h) = (50, 20);
        let pixels = plot_pixels(&history, &graph, w, h, 100);

        // Red tops the plot, blue lies on the floor, nothing in between.
        assert_eq!(pixels[25], [255, 0, 0, 255]);
        assert_eq!(pixels[(h - 1) * w + 25], [0, 0, 255, 255]);
        assert_eq!(pixels[10 * w + 25], [0, 0, 0, 0]);
    }

    #[test]
    fn plot_of_an_empty_history_is_transparent() {
        let graph = red_blue();
        let pixels = plot_pixels(&PopulationHistory::new(2), &graph, 8, 4, 100);
        assert_eq!(pixels.len(), 32);
        assert!(pixels.iter().all(|p| p[3] == 0));
    }

    #[test]
    fn hex_is_uppercase_rgb() {
        assert_eq!(hex_color([224, 0, 56]), "#E00038");
    }
}
