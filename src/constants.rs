//! Global constants for quotecard
//!
//! Consolidates layout and rendering constants to eliminate magic numbers
//! throughout the codebase.

// ============================================================================
// Layout Constants
// ============================================================================

/// Probe string used to derive line height at a candidate font size.
/// Pipe and backtick reach above/below most glyphs; capital A anchors ascent.
pub const LINE_HEIGHT_PROBE: &str = "|`A";

/// Vertical padding added to the probe bounding-box height per line (pixels)
pub const LINE_HEIGHT_PADDING: u32 = 5;

/// Extra horizontal margin reserved for code-block runs (pixels)
pub const CODE_BLOCK_MARGIN: f32 = 5.0;

/// Default upper bound for the font size search
pub const DEFAULT_MAX_FONT_SIZE: u32 = 128;

/// Default emoji glyph size multiplier relative to line height
pub const DEFAULT_EMOJI_SCALE: f32 = 1.3;

/// Smallest candidate tested by the multi-run sizer.
/// Size 1 is never tested as a fit; it is the forced fallback.
pub const MIN_MULTI_RUN_FONT_SIZE: u32 = 2;

// ============================================================================
// Rendering Constants
// ============================================================================

/// Default canvas width (pixels)
pub const DEFAULT_CANVAS_WIDTH: u32 = 1600;

/// Default canvas height (pixels)
pub const DEFAULT_CANVAS_HEIGHT: u32 = 900;

/// Corner radius for the rounded avatar mask (pixels)
pub const ROUNDED_AVATAR_RADIUS: f32 = 30.0;

/// Anti-aliasing transition width for avatar masks (pixels)
pub const MASK_AA_WIDTH: f32 = 1.0;

// ============================================================================
// Debug Overlay Constants
// ============================================================================

/// Spacing of the debug grid cross-hairs (pixels)
pub const DEBUG_GRID_STEP: u32 = 100;

/// Dash length for debug dashed lines (pixels)
pub const DEBUG_DASH_LEN: f32 = 2.0;

/// Gap-to-dash ratio for debug dashed lines
pub const DEBUG_DASH_RATIO: f32 = 5.0;
