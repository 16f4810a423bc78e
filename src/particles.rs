//! Particle system for background animations.
//!
//! A lightweight ambience layer behind the calendar grid: falling grains of
//! sand, as in an hourglass, or a slow dust drift. Purely cosmetic and
//! toggleable at runtime.

use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::theme::colors;

/// Types of background animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleMode {
    /// Sand grains falling like an hourglass (default)
    #[default]
    Sand,
    /// Slow, barely-moving dust
    Dust,
    /// No particles (static background)
    None,
}

impl ParticleMode {
    /// Cycle to the next mode
    pub fn next(&self) -> Self {
        match self {
            ParticleMode::Sand => ParticleMode::Dust,
            ParticleMode::Dust => ParticleMode::None,
            ParticleMode::None => ParticleMode::Sand,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParticleMode::Sand => "Sand",
            ParticleMode::Dust => "Dust",
            ParticleMode::None => "None",
        }
    }
}

/// A single particle in the system
#[derive(Debug, Clone)]
struct Particle {
    x: f32,
    y: f32,
    vy: f32,
    char: char,
    brightness: f32,
    fade_rate: f32,
    age: u32,
    sway_phase: f32,
}

impl Particle {
    fn new_sand(width: u16) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x: rng.gen_range(0.0..width.max(1) as f32),
            y: 0.0,
            vy: rng.gen_range(0.04..0.15),
            char: random_grain_char(),
            brightness: rng.gen_range(0.25..0.6),
            fade_rate: rng.gen_range(0.001..0.004),
            age: 0,
            sway_phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    fn new_dust(width: u16, height: u16) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x: rng.gen_range(0.0..width.max(1) as f32),
            y: rng.gen_range(0.0..height.max(1) as f32),
            vy: rng.gen_range(-0.03..0.03),
            char: random_grain_char(),
            brightness: rng.gen_range(0.1..0.35),
            fade_rate: rng.gen_range(0.001..0.005),
            age: 0,
            sway_phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    fn update(&mut self) {
        self.age = self.age.wrapping_add(1);
        let sway = (self.sway_phase + self.age as f32 * 0.05).sin() * 0.02;
        self.y += self.vy;
        self.x += sway;
        self.brightness -= self.fade_rate;
    }

    fn is_alive(&self, max_x: u16, max_y: u16) -> bool {
        self.brightness > 0.05
            && self.y >= 0.0
            && self.y < max_y as f32
            && self.x >= 0.0
            && self.x < max_x as f32
    }

    fn color(&self) -> Color {
        if let Color::Rgb(r, g, b) = colors::PARTICLE_SAND {
            let factor = self.brightness;
            Color::Rgb(
                (r as f32 * factor) as u8,
                (g as f32 * factor) as u8,
                (b as f32 * factor) as u8,
            )
        } else {
            colors::PARTICLE_SAND
        }
    }
}

fn random_grain_char() -> char {
    let mut rng = rand::thread_rng();
    let chars = ['·', '∙', '˙', '°', '∘'];
    chars[rng.gen_range(0..chars.len())]
}

/// The particle system managing all particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    mode: ParticleMode,
    max_particles: usize,
    frame_count: u64,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(ParticleMode::Sand, 50)
    }
}

impl ParticleSystem {
    pub fn new(mode: ParticleMode, max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            mode,
            max_particles,
            frame_count: 0,
        }
    }

    pub fn mode(&self) -> ParticleMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.next();
        self.particles.clear();
    }

    /// Update all particles and spawn new ones
    pub fn update(&mut self, width: u16, height: u16) {
        self.frame_count = self.frame_count.wrapping_add(1);

        if self.mode == ParticleMode::None {
            return;
        }

        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.is_alive(width, height));

        match self.mode {
            ParticleMode::Sand => {
                if self.frame_count % 6 == 0 && self.particles.len() < self.max_particles {
                    self.particles.push(Particle::new_sand(width));
                }
            }
            ParticleMode::Dust => {
                if self.frame_count % 10 == 0 && self.particles.len() < self.max_particles / 2 {
                    self.particles.push(Particle::new_dust(width, height));
                }
            }
            ParticleMode::None => {}
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        if self.mode == ParticleMode::None {
            return;
        }

        for particle in &self.particles {
            let x = particle.x as u16;
            let y = particle.y as u16;

            if x < area.width && y < area.height {
                let pos = (area.x + x, area.y + y);
                buf[pos].set_char(particle.char);
                buf[pos].set_style(Style::default().fg(particle.color()));
            }
        }
    }
}

/// Widget wrapper for the particle system
pub struct ParticleWidget<'a> {
    system: &'a ParticleSystem,
}

impl<'a> ParticleWidget<'a> {
    pub fn new(system: &'a ParticleSystem) -> Self {
        Self { system }
    }
}

impl Widget for ParticleWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.system.render(area, buf);
    }
}
