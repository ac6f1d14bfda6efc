//! Procedural fundus-like photographs: an orange disc with optional
//! vignetting and a seeded set of dark vessels.
//!
//! Vessels are described in scene coordinates; `shift` moves the camera so
//! the same "eye" can be captured twice with a small offset. The seed picks
//! the vessel geometry and the illumination centre.

use std::f32::consts::{PI, TAU};

/// How the vessels of a scene are laid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VesselLayout {
    /// Branching random walks starting near the disc centre.
    Tree { vessels: usize },
    /// Gently undulating vessels that all run close to `angle` (radians),
    /// about `spacing` pixels apart.
    Parallel { angle: f32, spacing: f32 },
}

#[derive(Clone, Debug)]
pub struct FundusScene {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub layout: VesselLayout,
    /// Relative darkening at the disc radius; 0 gives flat illumination.
    pub vignette: f32,
    /// Added to every channel, saturating.
    pub brightness: i16,
    /// Scene offset in pixels.
    pub shift: (f32, f32),
}

impl FundusScene {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            layout: VesselLayout::Tree { vessels: 10 },
            vignette: 0.35,
            brightness: 0,
            shift: (0.0, 0.0),
        }
    }

    pub fn with_layout(mut self, layout: VesselLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_vignette(mut self, vignette: f32) -> Self {
        self.vignette = vignette;
        self
    }

    pub fn with_brightness(mut self, brightness: i16) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_shift(mut self, dx: f32, dy: f32) -> Self {
        self.shift = (dx, dy);
        self
    }

    /// Interleaved RGB bytes, `width * height * 3`.
    pub fn render(&self) -> Vec<u8> {
        let (w, h) = (self.width, self.height);
        let mut rng = Lcg::new(self.seed);
        let (cx, cy) = (
            w as f32 * (0.4 + 0.2 * rng.next_f32()),
            h as f32 * (0.4 + 0.2 * rng.next_f32()),
        );
        let segments = match self.layout {
            VesselLayout::Tree { vessels } => tree_segments(&mut rng, w, h, vessels),
            VesselLayout::Parallel { angle, spacing } => {
                parallel_segments(&mut rng, w, h, angle, spacing)
            }
        };
        let darkness = self.rasterize(&segments);

        let radius = w.min(h) as f32 * 0.75;
        let base = [150.0f32, 90.0, 50.0];
        let vessel = [80.0f32, 35.0, 25.0];
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let sx = x as f32 - self.shift.0;
                let sy = y as f32 - self.shift.1;
                let r = ((sx - cx).powi(2) + (sy - cy).powi(2)).sqrt() / radius;
                let light = (1.0 - self.vignette * r * r).max(0.3);
                let d = darkness[y * w + x];
                for c in 0..3 {
                    let v = (base[c] * (1.0 - d) + vessel[c] * d) * light;
                    let v = v.round() as i16 + self.brightness;
                    data.push(v.clamp(0, 255) as u8);
                }
            }
        }
        data
    }

    /// Vessel coverage in `[0, 1]` per output pixel; each segment only
    /// touches the pixels of its bounding box.
    fn rasterize(&self, segments: &[Segment]) -> Vec<f32> {
        let (w, h) = (self.width, self.height);
        let mut darkness = vec![0.0f32; w * h];
        for seg in segments {
            let reach = seg.half_width + 1.0;
            let x_lo = (seg.ax.min(seg.bx) - reach + self.shift.0).floor().max(0.0) as usize;
            let y_lo = (seg.ay.min(seg.by) - reach + self.shift.1).floor().max(0.0) as usize;
            let x_hi = (seg.ax.max(seg.bx) + reach + self.shift.0).ceil();
            let y_hi = (seg.ay.max(seg.by) + reach + self.shift.1).ceil();
            if x_hi < 0.0 || y_hi < 0.0 {
                continue;
            }
            let x_hi = (x_hi as usize).min(w);
            let y_hi = (y_hi as usize).min(h);
            for y in y_lo..y_hi {
                for x in x_lo..x_hi {
                    let d = seg.distance(x as f32 - self.shift.0, y as f32 - self.shift.1);
                    if d < reach {
                        let t = ((reach - d) / 2.0).clamp(0.0, 1.0);
                        let px = &mut darkness[y * w + x];
                        *px = px.max(t);
                    }
                }
            }
        }
        darkness
    }
}

fn tree_segments(rng: &mut Lcg, w: usize, h: usize, vessels: usize) -> Vec<Segment> {
    let (w, h) = (w as f32, h as f32);
    let mut segments = Vec::new();
    for _ in 0..vessels {
        let mut x = w * (0.35 + 0.3 * rng.next_f32());
        let mut y = h * (0.35 + 0.3 * rng.next_f32());
        let mut angle = rng.next_f32() * TAU;
        let mut half_width = 2.0 + 1.5 * rng.next_f32();
        for _ in 0..10 {
            angle += (rng.next_f32() - 0.5) * 0.9;
            let len = 0.06 * w + 0.06 * w * rng.next_f32();
            let nx = x + angle.cos() * len;
            let ny = y + angle.sin() * len;
            segments.push(Segment {
                ax: x,
                ay: y,
                bx: nx,
                by: ny,
                half_width,
            });
            x = nx;
            y = ny;
            half_width = (half_width * 0.93).max(1.2);
        }
    }
    segments
}

/// Vessels covering the whole frame along `angle`, each a polyline with a
/// small sinusoidal sway so neighbours never touch.
fn parallel_segments(rng: &mut Lcg, w: usize, h: usize, angle: f32, spacing: f32) -> Vec<Segment> {
    let (w, h) = (w as f32, h as f32);
    let (cx, cy) = (w * 0.5, h * 0.5);
    let (dx, dy) = (angle.cos(), angle.sin());
    let (nx, ny) = (-dy, dx);
    let reach = (w * w + h * h).sqrt() * 0.5 + spacing;
    let step = 16.0;
    let mut segments = Vec::new();
    let mut offset = -reach;
    while offset <= reach {
        let o = offset + (rng.next_f32() - 0.5) * spacing * 0.25;
        let amplitude = 1.5 + 2.5 * rng.next_f32();
        let period = 160.0 + 160.0 * rng.next_f32();
        let phase = rng.next_f32() * TAU;
        let half_width = 2.5 + rng.next_f32();
        let point = |s: f32| {
            let sway = o + amplitude * (2.0 * PI * s / period + phase).sin();
            (cx + s * dx + sway * nx, cy + s * dy + sway * ny)
        };
        let mut s = -reach;
        while s < reach {
            let (ax, ay) = point(s);
            let (bx, by) = point(s + step);
            segments.push(Segment {
                ax,
                ay,
                bx,
                by,
                half_width,
            });
            s += step;
        }
        offset += spacing;
    }
    segments
}

struct Segment {
    ax: f32,
    ay: f32,
    bx: f32,
    by: f32,
    half_width: f32,
}

impl Segment {
    fn distance(&self, px: f32, py: f32) -> f32 {
        let (vx, vy) = (self.bx - self.ax, self.by - self.ay);
        let len2 = vx * vx + vy * vy;
        let t = if len2 > 0.0 {
            (((px - self.ax) * vx + (py - self.ay) * vy) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (qx, qy) = (self.ax + t * vx, self.ay + t * vy);
        ((px - qx).powi(2) + (py - qy).powi(2)).sqrt()
    }
}

struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg(seed.wrapping_mul(2654435761).wrapping_add(1))
    }

    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}
