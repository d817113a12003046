pub mod graphs;
pub mod toolbar;

use preygrid::Simulation;

/// Viewer-side state: playback controls and which panels are open.
pub struct UiState {
    pub paused: bool,
    pub speed_multiplier: f32,
    pub step_requested: bool,
    pub show_graphs: bool,
    pub show_legend: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            paused: false,
            speed_multiplier: 1.0,
            step_requested: false,
            show_graphs: true,
            show_legend: true,
        }
    }
}

/// Draw all egui UI panels.
pub fn draw_ui(sim: &Simulation, ui_state: &mut UiState) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, sim, ui_state);

        if ui_state.show_graphs {
            graphs::draw_graphs(ctx, sim);
        }

        if ui_state.show_legend {
            toolbar::draw_legend(ctx, sim);
        }
    });

    egui_macroquad::draw();
}
