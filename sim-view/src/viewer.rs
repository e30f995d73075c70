//! Interactive 3D electric field viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (charges, oscillation state, configuration, traced lines) and implements
//! [`eframe::App`] to render and control the simulation through an egui UI.

use eframe::App;
use glam::{Mat3, Vec3};
use sim_core::{
    charge::{ChargeMarker, ChargeSet, Polarity},
    config::Config,
    oscillator::OscillationState,
    phases,
    trace::FieldLine,
};

/// Charge markers are re-derived only every this many simulation ticks;
/// field lines regenerate every tick.
const MARKER_REFRESH_TICKS: u64 = 10;

/// Stroke width used for every field-line segment.
const LINE_STROKE_WIDTH: f32 = 1.5;

/// World-space padding applied to the debug bounding box.
const BOUNDS_PADDING: f32 = 2.0;

/// Preset charge arrangements selectable from the top bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    Dipole,
    Quadrupole,
    RandomCloud,
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`ChargeSet`], [`OscillationState`], [`Config`].
/// - The latest render data: field lines and charge markers.
/// - Camera state (orbit yaw/pitch, zoom, pan) and eframe/egui callbacks.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the field lines, charge markers, and optional bounds overlay.
///
/// ### Fields
/// - `charges` - Current charge set being simulated.
/// - `osc` - Baselines and noise seeds captured at scenario start.
/// - `cfg` - Global simulation configuration (rotation, oscillation, tracing).
/// - `lines` - Field lines traced on the most recent tick.
/// - `markers` - Charge markers, refreshed every [`MARKER_REFRESH_TICKS`].
///
/// - `rng` - Random number generator for scenario spawning and noise seeds.
/// - `scenario` - Currently selected charge arrangement.
/// - `cloud_count` - Number of charges spawned by the random-cloud scenario.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `show_bounds` - Whether the padded bounding box overlay is drawn.
/// - `positive_color` / `negative_color` - Color pair for signs; gradients
///   and markers derive from these.
///
/// - `yaw`, `pitch` - Orbit angles of the camera (radians).
/// - `zoom` - Pixels per world unit.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `tick` - Completed simulation ticks since the last scenario change.
/// - `sim_time` - Accumulated simulation time fed to the oscillator.
/// - `step_interval` - Target time step between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps (display only).
pub struct Viewer {
    charges: ChargeSet,
    osc: OscillationState,
    cfg: Config,
    lines: Vec<FieldLine>,
    markers: Vec<ChargeMarker>,

    rng: rand::rngs::ThreadRng,
    scenario: Scenario,
    cloud_count: usize,

    running: bool,
    show_bounds: bool,
    positive_color: egui::Color32,
    negative_color: egui::Color32,

    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: egui::Vec2,

    tick: u64,
    sim_time: f32,
    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a new viewer showing the dipole scenario.
    ///
    /// The default setup is:
    /// - A dipole 8 world units apart with magnitude 3.
    /// - [`Config::default`] for simulation parameters.
    /// - Field lines and markers already traced, so the first frame is not
    ///   empty even before the simulation runs.
    ///
    /// The camera starts slightly tilted so all three axes are visible.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`] ready to be passed to `eframe::run_native`.
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let charges = ChargeSet::dipole(8.0, 3.0);
        let osc = OscillationState::capture(&charges, &mut rng);
        let cfg = Config::default();
        let lines = phases::trace_phase(&charges, &cfg);
        let markers = charges.markers();

        Self {
            charges,
            osc,
            cfg,
            lines,
            markers,
            rng,
            scenario: Scenario::Dipole,
            cloud_count: 8,
            running: false,
            show_bounds: false,
            positive_color: egui::Color32::from_rgb(235, 90, 60),
            negative_color: egui::Color32::from_rgb(70, 130, 235),
            yaw: 0.6,
            pitch: 0.35,
            zoom: 24.0,
            pan: egui::vec2(0.0, 0.0),
            tick: 0,
            sim_time: 0.0,
            step_interval: 0.05,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        }
    }

    /// Replaces the charge set with the given scenario and restarts the
    /// simulation clock.
    ///
    /// The oscillation baselines and seeds are recaptured for the new set,
    /// lines and markers are regenerated immediately, and auto-running stops.
    /// Camera and configuration are kept.
    fn apply_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
        self.charges = match scenario {
            Scenario::Dipole => ChargeSet::dipole(8.0, 3.0),
            Scenario::Quadrupole => ChargeSet::quadrupole(8.0, 3.0),
            Scenario::RandomCloud => {
                ChargeSet::random_in_cube(self.cloud_count, 8.0, 1.0..=4.0, &mut self.rng)
            }
        };
        self.osc = OscillationState::capture(&self.charges, &mut self.rng);
        self.tick = 0;
        self.sim_time = 0.0;
        self.lines = phases::trace_phase(&self.charges, &self.cfg);
        self.markers = self.charges.markers();
        self.running = false;

        log::info!(
            "scenario {:?}: {} charges, {} field lines",
            scenario,
            self.charges.points.len(),
            self.lines.len()
        );
    }

    /// Advances the simulation by a single tick of length `dt`.
    ///
    /// The tick consists of:
    /// 1. [`phases::motion_phase`] — rotate charges about the configured axis.
    /// 2. [`phases::oscillation_phase`] — modulate charge magnitudes.
    /// 3. [`phases::trace_phase`] — rebuild every field line from scratch.
    ///
    /// Markers are only re-derived every [`MARKER_REFRESH_TICKS`] ticks; the
    /// full line rebuild runs on every tick.
    fn step_once(&mut self, dt: f32) {
        phases::motion_phase(&mut self.charges, &self.cfg, dt);
        phases::oscillation_phase(&mut self.charges, &self.osc, self.sim_time, &self.cfg);
        self.sim_time += dt;

        self.lines = phases::trace_phase(&self.charges, &self.cfg);

        self.tick += 1;
        if self.tick % MARKER_REFRESH_TICKS == 0 {
            self.markers = self.charges.markers();
        }

        log::debug!("tick {}: {} field lines", self.tick, self.lines.len());
    }

    /// The camera rotation applied to world positions before projection.
    fn view_basis(&self) -> Mat3 {
        Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_y(self.yaw)
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are rotated into the camera basis, orthographically
    /// projected (the view depth axis is dropped), scaled by `zoom`, offset
    /// by `pan`, and centered inside the given `rect`. The y-axis is flipped
    /// so that positive y goes up in world space.
    ///
    /// ### Parameters
    /// - `p` - World-space position.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding egui position in screen-space.
    fn world_to_screen(&self, p: Vec3, rect: egui::Rect) -> egui::Pos2 {
        let v = self.view_basis() * p;
        let center = rect.center();
        egui::pos2(
            center.x + v.x * self.zoom + self.pan.x,
            center.y - v.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to a world-space point on the
    /// camera plane (view-space depth zero).
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] for points on that
    /// plane (up to floating point rounding), using the same `zoom`, `pan`,
    /// and `rect` center.
    ///
    /// ### Parameters
    /// - `p` - Screen-space position in egui coordinates.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding world-space point on the camera plane.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec3 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        self.view_basis().transpose() * Vec3::new(x, y, 0.0)
    }

    /// Gamma-space linear interpolation between two colors.
    fn lerp_color(a: egui::Color32, b: egui::Color32, t: f32) -> egui::Color32 {
        let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
        egui::Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
    }

    /// Start and end colors of a line's gradient: source-sign color toward
    /// the opposite color when the line was captured by an opposite charge,
    /// otherwise a flat gradient in the source color.
    fn line_endpoint_colors(&self, line: &FieldLine) -> (egui::Color32, egui::Color32) {
        let (own, opposite) = if line.source_sign >= 0.0 {
            (self.positive_color, self.negative_color)
        } else {
            (self.negative_color, self.positive_color)
        };
        let end = if line.terminated_on_opposite {
            opposite
        } else {
            own
        };
        (own, end)
    }

    fn marker_color(&self, polarity: Polarity) -> egui::Color32 {
        match polarity {
            Polarity::Positive => self.positive_color,
            Polarity::Negative => self.negative_color,
            Polarity::Neutral => egui::Color32::GRAY,
        }
    }

    /// Draws every traced field line as a gradient-colored segment strip.
    fn draw_field_lines(&self, painter: &egui::Painter, rect: egui::Rect) {
        for line in &self.lines {
            let (start_color, end_color) = self.line_endpoint_colors(line);
            // Traced lines always carry at least two points.
            let segments = (line.points.len() - 1) as f32;

            for (i, pair) in line.points.windows(2).enumerate() {
                let t = (i as f32 + 0.5) / segments;
                let color = Self::lerp_color(start_color, end_color, t);
                let a = self.world_to_screen(pair[0], rect);
                let b = self.world_to_screen(pair[1], rect);
                painter.line_segment([a, b], egui::Stroke::new(LINE_STROKE_WIDTH, color));
            }
        }
    }

    /// Draws the charge markers, radius scaled with the magnitude snapshot.
    fn draw_markers(&self, painter: &egui::Painter, rect: egui::Rect) {
        for m in &self.markers {
            let p = self.world_to_screen(m.pos, rect);
            let r = (m.charge.abs().sqrt() * 4.0).clamp(3.0, 12.0);
            painter.circle_filled(p, r, self.marker_color(m.polarity));
        }
    }

    /// Draws the padded bounding box of all charges as a wireframe overlay.
    fn draw_bounds(&self, painter: &egui::Painter, rect: egui::Rect) {
        let Some((min, max)) = self.charges.bounding_box(BOUNDS_PADDING) else {
            return;
        };

        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        const EDGES: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];

        let stroke = egui::Stroke::new(1.0, egui::Color32::DARK_GRAY);
        for (a, b) in EDGES {
            painter.line_segment(
                [
                    self.world_to_screen(corners[a], rect),
                    self.world_to_screen(corners[b], rect),
                ],
                stroke,
            );
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, scenarios, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once(self.step_interval as f32);
                    self.last_step_time = now;
                }

                ui.separator();

                if ui.button("Dipole").clicked() {
                    self.apply_scenario(Scenario::Dipole);
                }
                if ui.button("Quadrupole").clicked() {
                    self.apply_scenario(Scenario::Quadrupole);
                }
                if ui.button("Random cloud").clicked() {
                    self.apply_scenario(Scenario::RandomCloud);
                }
                if ui.button("Reset").clicked() {
                    self.apply_scenario(self.scenario);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 2.0..=100.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (time step, charge/line/point counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("charges = {}", self.charges.points.len()));
                ui.label(format!("lines = {}", self.lines.len()));
                ui.label(format!(
                    "points = {}",
                    self.lines.iter().map(|l| l.points.len()).sum::<usize>()
                ));
            });
        });
    }

    /// Builds the right-hand configuration panel for simulation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Rotation");
                Self::labeled_drag_f32(
                    ui,
                    "speed (deg/s):",
                    &mut self.cfg.angular_speed_deg,
                    0.0..=360.0,
                    1.0,
                );
                Self::labeled_drag_f32(ui, "axis.x:", &mut self.cfg.rotation_axis.x, -1.0..=1.0, 0.05);
                Self::labeled_drag_f32(ui, "axis.y:", &mut self.cfg.rotation_axis.y, -1.0..=1.0, 0.05);
                Self::labeled_drag_f32(ui, "axis.z:", &mut self.cfg.rotation_axis.z, -1.0..=1.0, 0.05);
                Self::labeled_drag_f32(ui, "pivot.x:", &mut self.cfg.pivot.x, -20.0..=20.0, 0.25);
                Self::labeled_drag_f32(ui, "pivot.y:", &mut self.cfg.pivot.y, -20.0..=20.0, 0.25);
                Self::labeled_drag_f32(ui, "pivot.z:", &mut self.cfg.pivot.z, -20.0..=20.0, 0.25);

                ui.separator();
                ui.label("Oscillation");
                ui.checkbox(&mut self.cfg.oscillation_enabled, "enabled");
                Self::labeled_drag_f32(
                    ui,
                    "speed:",
                    &mut self.cfg.oscillation_speed,
                    0.0..=5.0,
                    0.05,
                );

                ui.separator();
                ui.label("Tracing");
                Self::labeled_drag_usize(
                    ui,
                    "lines per charge:",
                    &mut self.cfg.lines_per_charge,
                    1..=128,
                    1.0,
                );
                Self::labeled_drag_usize(ui, "max steps:", &mut self.cfg.max_steps, 10..=2000, 10.0);
                Self::labeled_drag_f32(ui, "step size:", &mut self.cfg.step_size, 0.05..=2.0, 0.05);

                ui.separator();
                ui.label("Colors");
                ui.horizontal(|ui| {
                    ui.label("positive:");
                    ui.color_edit_button_srgba(&mut self.positive_color);
                });
                ui.horizontal(|ui| {
                    ui.label("negative:");
                    ui.color_edit_button_srgba(&mut self.negative_color);
                });

                ui.separator();
                ui.label("Random cloud");
                Self::labeled_drag_usize(ui, "charges:", &mut self.cloud_count, 1..=64, 1.0);

                ui.separator();
                ui.checkbox(&mut self.show_bounds, "show bounds");

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    /// Builds the central panel where field lines and charges are drawn and
    /// the camera is controlled.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Orbit with drag; pan while shift is held.
            if response.dragged() {
                let delta = response.drag_delta();
                if ui.ctx().input(|i| i.modifiers.shift) {
                    self.pan += delta;
                } else {
                    self.yaw += delta.x * 0.01;
                    self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.55, 1.55);
                }
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    let new_zoom = (self.zoom * factor).clamp(2.0, 100.0);
                    self.zoom = new_zoom;

                    let screen_after = self.world_to_screen(world_before, rect);

                    let delta = pointer_screen - screen_after;
                    self.pan += delta;
                }
            }

            // Overlay first so lines and markers draw on top of it.
            if self.show_bounds {
                self.draw_bounds(&painter, rect);
            }

            self.draw_field_lines(&painter, rect);
            self.draw_markers(&painter, rect);

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once(self.step_interval as f32);
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// This method:
    /// - Renders the top control bar and status bar.
    /// - Renders the config side panel.
    /// - Draws the central field view and handles camera interactions.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn screen_to_world_and_back_is_roundtrip() {
        let mut viewer = Viewer::new();
        // Use a non-trivial camera to exercise the rotation math.
        viewer.yaw = 0.8;
        viewer.pitch = -0.3;
        viewer.zoom = 17.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let screen_points = [
            egui::pos2(400.0, 300.0),
            egui::pos2(10.0, 580.0),
            egui::pos2(623.5, 41.25),
        ];

        let eps = 1e-2;

        for s in screen_points {
            let world = viewer.screen_to_world(s, rect);
            let back = viewer.world_to_screen(world, rect);

            assert!(
                (back.x - s.x).abs() < eps && (back.y - s.y).abs() < eps,
                "roundtrip mismatch: s={:?}, back={:?}",
                s,
                back
            );
        }
    }

    #[test]
    fn apply_scenario_restores_basic_state() {
        let mut viewer = Viewer::new();

        viewer.cloud_count = 6;
        viewer.apply_scenario(Scenario::RandomCloud);
        assert_eq!(viewer.charges.points.len(), 6);
        assert_eq!(viewer.osc.len(), 6);

        // Mutate state to make sure the next reset actually changes things.
        viewer.running = true;
        viewer.step_once(0.1);
        assert!(viewer.tick > 0);

        viewer.apply_scenario(Scenario::Dipole);

        assert_eq!(viewer.charges.points.len(), 2);
        assert_eq!(viewer.osc.len(), 2);
        assert_eq!(viewer.markers.len(), 2);
        assert_eq!(viewer.tick, 0);
        assert_eq!(viewer.sim_time, 0.0);
        assert!(!viewer.running);

        // A dipole always yields visible lines right away.
        assert!(!viewer.lines.is_empty());
    }

    #[test]
    fn step_once_regenerates_lines_and_advances_the_clock() {
        let mut viewer = Viewer::new();

        viewer.step_once(0.05);

        assert_eq!(viewer.tick, 1);
        assert!(viewer.sim_time > 0.0);
        assert!(!viewer.lines.is_empty());

        // Lines are seeded from the positive charge only.
        for line in &viewer.lines {
            assert_eq!(line.source_sign, 1.0);
        }
    }

    #[test]
    fn markers_refresh_only_every_tenth_tick() {
        let mut viewer = Viewer::new();
        let initial_pos = viewer.markers[0].pos;

        // Nine ticks: charges rotate, but the marker snapshot stays stale.
        for _ in 0..9 {
            viewer.step_once(0.1);
        }
        assert_eq!(viewer.markers[0].pos, initial_pos);

        // The tenth tick refreshes the snapshot to the rotated positions.
        viewer.step_once(0.1);
        assert_eq!(viewer.markers[0].pos, viewer.charges.points[0].pos);
        assert!(viewer.markers[0].pos != initial_pos);
    }

    #[test]
    fn gradient_endpoints_follow_termination() {
        let viewer = Viewer::new();

        let captured = FieldLine {
            points: vec![Vec3::ZERO, Vec3::X],
            source: 0,
            source_sign: 1.0,
            terminated_on_opposite: true,
        };
        let (start, end) = viewer.line_endpoint_colors(&captured);
        assert_eq!(start, viewer.positive_color);
        assert_eq!(end, viewer.negative_color);

        let open = FieldLine {
            terminated_on_opposite: false,
            ..captured
        };
        let (start, end) = viewer.line_endpoint_colors(&open);
        assert_eq!(start, viewer.positive_color);
        assert_eq!(end, viewer.positive_color);
    }
}
