use egui;

use preygrid::config::PLOT_WINDOW;
use preygrid::Simulation;

/// Population history of every type over the last `PLOT_WINDOW` ticks.
pub fn draw_graphs(ctx: &egui::Context, sim: &Simulation) {
    egui::Window::new("Population")
        .default_pos(egui::pos2(20.0, 90.0))
        .default_size(egui::vec2(360.0, 200.0))
        .resizable(true)
        .show(ctx, |ui| {
            let size = egui::vec2(ui.available_width(), 160.0);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let rect = response.rect;
            painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

            let history = sim.history();
            let max_val = sim
                .graph()
                .ids()
                .flat_map(|id| history.recent(id, PLOT_WINDOW).iter().copied())
                .max()
                .unwrap_or(0)
                .max(1) as f32;

            for id in sim.graph().ids() {
                let [r, g, b] = sim.graph().species(id).color;
                let samples = history.recent(id, PLOT_WINDOW);
                draw_line_in_rect(&painter, samples, max_val, rect, egui::Color32::from_rgb(r, g, b));
            }

            ui.horizontal_wrapped(|ui| {
                let counts = sim.store().aggregate_counts_by_type();
                for id in sim.graph().ids() {
                    let [r, g, b] = sim.graph().species(id).color;
                    ui.colored_label(
                        egui::Color32::from_rgb(r, g, b),
                        format!("{} {}", sim.graph().name(id), counts[id.index()]),
                    );
                }
            });
        });
}

fn draw_line_in_rect(
    painter: &egui::Painter,
    samples: &[u32],
    max_val: f32,
    rect: egui::Rect,
    color: egui::Color32,
) {
    let len = samples.len();
    if len < 2 {
        return;
    }

    let points: Vec<egui::Pos2> = samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = rect.left() + (i as f32 / (len - 1) as f32) * rect.width();
            let y = rect.bottom() - (v as f32 / max_val) * rect.height();
            egui::pos2(x, y)
        })
        .collect();

    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(2.5, color));
    }
}
