// Shared tuning constants for the three render loops. Values are per frame
// (60 fps assumed) unless the name says otherwise.

// Frame clock
pub const FRAME_DT_MAX_MS: f64 = 50.0; // longest step a single frame may advance animation time

// Cursor: main follower spring
pub const CURSOR_MAIN_STIFFNESS: f32 = 0.13;
pub const CURSOR_MAIN_DAMPING: f32 = 0.74;
pub const CURSOR_MAGNET_BLEND: f32 = 0.4; // fraction of the way toward a hovered control's centre
pub const CURSOR_OFFSCREEN: f32 = -600.0; // sentinel for "pointer not seen yet"

// Cursor: timing and morph
pub const CURSOR_TIME_STEP: f32 = 0.018;
pub const CURSOR_MORPH_STEP: f32 = 0.055; // ~18 frames for a full mode morph
pub const CURSOR_MAX_SATELLITES: usize = 6;
pub const CURSOR_SAT_SPIN_EVEN: f32 = 0.6;
pub const CURSOR_SAT_SPIN_ODD: f32 = -0.5;

// Cursor: main blob shape
pub const CURSOR_BLOB_SAMPLES: usize = 9;
pub const CURSOR_SQUISH_PER_SPEED: f32 = 0.038;
pub const CURSOR_SQUISH_MAX: f32 = 0.5;
pub const CURSOR_SQUISH_Y_RATIO: f32 = 0.6;
pub const CURSOR_DOT_RADIUS: f32 = 2.2;
pub const CURSOR_IBEAM_HEIGHT: f32 = 22.0;
pub const CURSOR_IBEAM_SERIF: f32 = 6.0;

// Cursor: click splats
pub const SPLAT_COUNT: usize = 8;
pub const SPLAT_SPEED_MIN: f32 = 2.5;
pub const SPLAT_SPEED_SPAN: f32 = 3.0;
pub const SPLAT_RADIUS_MIN: f32 = 4.0;
pub const SPLAT_RADIUS_SPAN: f32 = 3.0;
pub const SPLAT_ALPHA: f32 = 0.85;
pub const SPLAT_DRAG: f32 = 0.88;
pub const SPLAT_FADE: f32 = 0.82;
pub const SPLAT_SHRINK: f32 = 0.95;
pub const SPLAT_MIN_ALPHA: f32 = 0.02;

// Accent colour shared by cursor and particle text (#c7fb38)
pub const ACCENT_RGB: [u8; 3] = [199, 251, 56];

// Skill universe: per-frame displacement
pub const SKILL_FLOAT_AMPLITUDE: f32 = 3.0;
pub const SKILL_FLOAT_X_FREQ: f32 = 0.01;
pub const SKILL_REPEL_RADIUS: f32 = 300.0;
pub const SKILL_REPEL_STRENGTH: f32 = 0.1;
pub const SKILL_POINTER_OFFSCREEN: f32 = -1000.0;

// Skill universe: layout
pub const SKILL_SCALE_THRESHOLD: f32 = 800.0; // below this min viewport dim the graph shrinks
pub const SKILL_SCALE_REFERENCE: f32 = 1000.0;
pub const SKILL_FAN_MAX: f32 = std::f32::consts::PI * 1.2;
pub const SKILL_FAN_PER_SKILL: f32 = 0.3;

// Skill universe: energy beams
pub const BEAM_STEP: f32 = 8.0; // px between samples along a beam
pub const BEAM_AMPLITUDE: f32 = 0.8;
pub const BEAM_TIME_SCALE: f32 = 10.0;
pub const ORBIT_DASH: [f32; 2] = [5.0, 5.0];
pub const LABEL_WRAP_LEN: usize = 9;
pub const LABEL_LINE_OFFSET: f32 = 6.0;

// Particle text
pub const PARTICLE_COUNT: usize = 4000;
pub const PARTICLE_SCATTER_EXTENT: f32 = 12.0; // side of the dispersed cube
pub const PARTICLE_RATE_FOCUSED: f32 = 0.08;
pub const PARTICLE_RATE_DISPERSED: f32 = 0.03;
pub const PARTICLE_JITTER_FOCUSED: f32 = 0.003;
pub const PARTICLE_JITTER_DISPERSED: f32 = 0.005;
pub const PARTICLE_JITTER_FREQ_FOCUSED: f32 = 3.0;
pub const PARTICLE_JITTER_FREQ_DISPERSED: f32 = 0.5;
pub const PARTICLE_SIZE: f32 = 0.035; // world units
pub const PARTICLE_OPACITY: f32 = 0.9;
pub const GLYPH_CURVE_SEGMENTS: usize = 12;
pub const GLYPH_MAX_SIZE: f32 = 1.5;
pub const GLYPH_SIZE_BUDGET: f32 = 3.5; // shared across the symbol's characters

// Particle camera
pub const PARTICLE_CAMERA_Z: f32 = 5.0;
pub const PARTICLE_CAMERA_FOV_DEG: f32 = 50.0;
