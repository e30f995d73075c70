use glam::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub rotation_axis: Vec3,
    pub angular_speed_deg: f32,
    pub pivot: Vec3,
    pub oscillation_enabled: bool,
    pub oscillation_speed: f32,
    pub lines_per_charge: usize,
    pub max_steps: usize,
    pub step_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rotation_axis: Vec3::Y,
            angular_speed_deg: 30.0,
            pivot: Vec3::ZERO,
            oscillation_enabled: true,
            oscillation_speed: 0.5,
            lines_per_charge: 24,
            max_steps: 300,
            step_size: 0.3,
        }
    }
}
