//! Parameter control panel
//!
//! The six tunables, bound straight to the scene: every changed widget emits
//! a [`ParamUpdate`] that is applied before this function returns, so the
//! next tick draws with the new value. No debouncing.

use glam::Vec3;

use crate::scene::material::ROUGHNESS_FLOOR;
use crate::scene::{ParamUpdate, SharedScene, LIGHT_RANGE};

/// Build the panel for one egui frame and apply any changes to the scene.
pub fn show(ctx: &egui::Context, scene: &SharedScene, camera_pos: Vec3) {
    let current = scene.lock().uniform_set();
    let mut albedo = current.albedo.to_array();
    let mut metalness = current.metalness;
    let mut roughness = current.roughness;
    let mut light = current.light_pos;
    let mut updates: Vec<ParamUpdate> = Vec::new();

    egui::Window::new("Parameters")
        .default_pos([10.0, 10.0])
        .default_size([240.0, 320.0])
        .show(ctx, |ui| {
            ui.heading("Material");
            ui.horizontal(|ui| {
                ui.label("Albedo:");
                if ui.color_edit_button_rgb(&mut albedo).changed() {
                    updates.push(ParamUpdate::Albedo(Vec3::from_array(albedo)));
                }
            });
            if ui
                .add(egui::Slider::new(&mut metalness, 0.0..=1.0).text("metalness"))
                .changed()
            {
                updates.push(ParamUpdate::Metalness(metalness));
            }
            if ui
                .add(egui::Slider::new(&mut roughness, ROUGHNESS_FLOOR..=1.0).text("roughness"))
                .changed()
            {
                updates.push(ParamUpdate::Roughness(roughness));
            }
            ui.separator();

            ui.heading("Light");
            if ui
                .add(egui::Slider::new(&mut light.x, -LIGHT_RANGE..=LIGHT_RANGE).text("x"))
                .changed()
            {
                updates.push(ParamUpdate::LightX(light.x));
            }
            if ui
                .add(egui::Slider::new(&mut light.y, -LIGHT_RANGE..=LIGHT_RANGE).text("y"))
                .changed()
            {
                updates.push(ParamUpdate::LightY(light.y));
            }
            if ui
                .add(egui::Slider::new(&mut light.z, -LIGHT_RANGE..=LIGHT_RANGE).text("z"))
                .changed()
            {
                updates.push(ParamUpdate::LightZ(light.z));
            }
            ui.separator();

            ui.heading("Camera");
            ui.label(format!(
                "Position: ({:.1}, {:.1}, {:.1})",
                camera_pos.x, camera_pos.y, camera_pos.z
            ));
            ui.label("Drag - orbit, scroll - zoom");
        });

    if !updates.is_empty() {
        let mut scene = scene.lock();
        for update in updates {
            scene.apply(update);
        }
    }
}
