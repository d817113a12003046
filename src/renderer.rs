use macroquad::prelude::*;

use preygrid::visual;
use preygrid::Simulation;

const BG_COLOR: Color = Color::new(0.02, 0.03, 0.08, 1.0);
const EMPTY_CELL: Color = Color::new(0.08, 0.10, 0.15, 1.0);
const TOOLBAR_HEIGHT: f32 = 64.0;

/// Screen rectangle the grid is drawn into, keeping cells square.
pub struct GridLayout {
    pub origin: Vec2,
    pub cell: f32,
}

impl GridLayout {
    pub fn fit(rows: usize, cols: usize) -> Self {
        let margin = 16.0;
        let avail_w = (screen_width() - margin * 2.0).max(1.0);
        let avail_h = (screen_height() - TOOLBAR_HEIGHT - margin * 2.0).max(1.0);
        let cell = (avail_w / cols.max(1) as f32)
            .min(avail_h / rows.max(1) as f32)
            .min(preygrid::config::CELL_PIXELS * 2.0);
        let grid_w = cell * cols as f32;
        let grid_h = cell * rows as f32;
        Self {
            origin: vec2(
                (screen_width() - grid_w) * 0.5,
                TOOLBAR_HEIGHT + (screen_height() - TOOLBAR_HEIGHT - grid_h) * 0.5,
            ),
            cell,
        }
    }
}

pub fn draw(sim: &Simulation, paused: bool) {
    clear_background(BG_COLOR);

    let topology = sim.store().topology();
    let layout = GridLayout::fit(topology.height(), topology.width());
    let pixels = visual::grid_pixels(sim.store(), sim.graph());

    for pos in topology.valid_cells() {
        let x = layout.origin.x + pos.col as f32 * layout.cell;
        let y = layout.origin.y + pos.row as f32 * layout.cell;
        draw_rectangle(x, y, layout.cell - 1.0, layout.cell - 1.0, EMPTY_CELL);

        let [r, g, b, a] = pixels[pos.row as usize * topology.width() + pos.col as usize];
        if a > 0 {
            draw_rectangle(x, y, layout.cell - 1.0, layout.cell - 1.0, Color::from_rgba(r, g, b, a));
        }
    }

    draw_hud(sim, paused);
}

fn draw_hud(sim: &Simulation, paused: bool) {
    let tc = Color::new(0.7, 0.75, 0.8, 1.0);
    let sh = Color::new(0.0, 0.0, 0.0, 0.5);
    let base_y = screen_height() - 70.0;

    let counts = sim.store().aggregate_counts_by_type();
    let mut lines = vec![
        format!("FPS: {}", get_fps()),
        format!("Tick: {}", sim.tick_count()),
    ];
    for id in sim.graph().ids() {
        lines.push(format!("{}: {}", sim.graph().name(id), counts[id.index()]));
    }

    for (i, line) in lines.iter().enumerate() {
        let y = base_y - (lines.len() - 1 - i) as f32 * 20.0 + 40.0;
        draw_text(line, 11.0, y + 1.0, 18.0, sh);
        draw_text(line, 10.0, y, 18.0, tc);
    }

    if sim.is_extinct() {
        centred_banner("EXTINCT", Color::new(1.0, 0.35, 0.3, 0.9));
    } else if paused {
        centred_banner("PAUSED (Space to resume, N to step)", Color::new(1.0, 0.8, 0.2, 0.9));
    }
}

fn centred_banner(text: &str, color: Color) {
    let sh = Color::new(0.0, 0.0, 0.0, 0.5);
    let tw = measure_text(text, None, 24, 1.0).width;
    let x = screen_width() * 0.5 - tw * 0.5;
    let y = TOOLBAR_HEIGHT + 30.0;
    draw_text(text, x + 1.0, y + 1.0, 24.0, sh);
    draw_text(text, x, y, 24.0, color);
}
