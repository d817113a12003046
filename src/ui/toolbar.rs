use egui;

use preygrid::visual::hex_color;
use preygrid::Simulation;

use super::UiState;

/// Slim status strip + compact controls.
pub fn draw_toolbar(ctx: &egui::Context, sim: &Simulation, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            title_badge(ui, "PREYGRID");

            ui.separator();
            compact_group(ui, "Sim", |ui| {
                let pause_label = if ui_state.paused { "Play" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    ui_state.paused = !ui_state.paused;
                }
                if ui.button("Step").clicked() {
                    ui_state.step_requested = true;
                }
            });

            compact_group(ui, "Speed", |ui| {
                for speed in [0.5, 1.0, 2.0, 5.0, 10.0] {
                    speed_button(ui, ui_state, speed);
                }
            });

            compact_group(ui, "Panels", |ui| {
                ui.toggle_value(&mut ui_state.show_graphs, "Graphs");
                ui.toggle_value(&mut ui_state.show_legend, "Legend");
            });
        });

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            metric_chip(ui, "Tick", format!("{}", sim.tick_count()));
            metric_chip(ui, "Agents", format!("{}", sim.store().live_count()));

            let counts = sim.store().aggregate_counts_by_type();
            for id in sim.graph().ids() {
                metric_chip(ui, sim.graph().name(id), format!("{}", counts[id.index()]));
            }

            let last = sim.last_tick();
            metric_chip(ui, "Kills", format!("{}", last.kills));
            metric_chip(ui, "Births", format!("{}", last.births));
            metric_chip(
                ui,
                "Deaths",
                format!("{} age / {} crowding", last.deaths_by_age, last.deaths_by_cull),
            );

            if sim.is_extinct() {
                status_chip(ui, "EXTINCT", egui::Color32::from_rgb(230, 90, 80));
            } else if ui_state.paused {
                status_chip(ui, "PAUSED", egui::Color32::from_rgb(240, 200, 60));
            }
        });
        ui.add_space(3.0);
    });
}

/// Type names, colours and who eats whom.
pub fn draw_legend(ctx: &egui::Context, sim: &Simulation) {
    let graph = sim.graph();
    egui::Window::new("Legend")
        .default_pos(egui::pos2(20.0, 320.0))
        .resizable(false)
        .show(ctx, |ui| {
            for id in graph.ids() {
                let species = graph.species(id);
                let [r, g, b] = species.color;
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(r, g, b), "■");
                    ui.label(format!("{} ({})", species.name, hex_color(species.color)));
                });

                let prey: Vec<&str> = graph.prey_of(id).iter().map(|&p| graph.name(p)).collect();
                let eats = if prey.is_empty() {
                    "base of chain".to_string()
                } else {
                    format!("eats {}", prey.join(", "))
                };
                ui.label(egui::RichText::new(eats).small().color(egui::Color32::from_rgb(150, 170, 185)));
            }
        });
}

fn speed_button(ui: &mut egui::Ui, ui_state: &mut UiState, speed: f32) {
    let label = format!("{speed}x");
    let selected = (ui_state.speed_multiplier - speed).abs() < 0.01;
    if ui.selectable_label(selected, label).clicked() {
        ui_state.speed_multiplier = speed;
    }
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    let text = egui::RichText::new(label)
        .strong()
        .color(egui::Color32::from_rgb(190, 220, 255));
    ui.label(text);
}

fn compact_group(ui: &mut egui::Ui, heading: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(heading)
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
            add_contents(ui);
        });
    });
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    let text = egui::RichText::new(format!("{key}: {value}"))
        .small()
        .color(egui::Color32::from_rgb(205, 215, 225));
    ui.group(|ui| {
        ui.label(text);
    });
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(label).small().strong().color(color));
    });
}
