//! Accepted names for each logical parameter, in lookup priority order.
//!
//! The first name present in a parameter set wins.

/// Taper half-width `N` (cells on each side of the center).
pub const HALF_WIDTH: &[&str] = &["n_ext", "N", "n", "N_unitcell"];

pub const D_CENTER: &[&str] = &["d0"];
pub const H_CENTER: &[&str] = &["h0"];

/// Left-side (mirror) boundary targets.
pub const D_LEFT: &[&str] = &["d17_mir"];
pub const H_LEFT: &[&str] = &["h17_mir"];

/// Right-side (waveguide) boundary targets.
pub const D_RIGHT: &[&str] = &["d17_wg"];
pub const H_RIGHT: &[&str] = &["h17_wg"];

/// Generic boundary targets shared by both sides.
pub const D_BOUNDARY: &[&str] = &["d17", "dN", "d_ext"];
pub const H_BOUNDARY: &[&str] = &["h17", "hN", "h_ext"];

/// Decay length of the taper, in cells.
pub const DECAY_LENGTH: &[&str] = &["delx", "delta_x", "dx"];

/// Decay order (knee sharpness).
pub const DECAY_ORDER: &[&str] = &["M", "m"];

/// Cell-count knob the variant models read.
pub const CELL_COUNT: &str = "n";

/// Generic boundary slots the variant models read.
pub const D_SLOT: &str = "d17";
pub const H_SLOT: &str = "h17";

/// Key forced into every saved canonical file by `taper profile`.
pub const WG_CELL_WIDTH: &str = "wg_Cell_w_1";
