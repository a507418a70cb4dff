// PALETTE
/// Number of user-assignable color slots per shape kind.
pub const PALETTE_SIZE: usize = 4;
/// Color used for annotations whose upstream color isn't part of the known vocabulary (gray arrows in analysis).
pub const NEUTRAL_COLOR: &str = "#4a4a4a";
/// Multiplier applied on top of the base opacity to annotations the board draws mid-interaction.
pub const TRANSLUCENT_OPACITY_FACTOR: f64 = 0.25;

// DEFAULT SETTINGS
pub const DEFAULT_ARROW_COLORS: [&str; PALETTE_SIZE] = ["#15781B", "#C60B0B", "#0080C6", "#FFC20E"];
pub const DEFAULT_SQUARE_COLORS: [&str; PALETTE_SIZE] = ["#E69000", "#003088", "#990018", "#125740"];
pub const DEFAULT_ARROW_OPACITY: &str = "0.85";
pub const DEFAULT_SQUARE_OPACITY: &str = "0.67";

// BOARD GEOMETRY
pub const BOARD_FILES: &str = "abcdefgh";
/// Ranks listed from the top row of an unflipped board downwards.
pub const BOARD_RANKS_FROM_TOP: &str = "87654321";
pub const BOARD_SQUARES_PER_SIDE: u32 = 8;
/// Amount the tip of every arrow is pulled back towards its tail, in squares.
/// Tuned for a board 512 units wide, where it is 160 units.
pub const ARROW_TIP_SHORTENING: f64 = 160. / 512.;

// ARROWS
/// Line width the board uses for a regular arrow.
pub const ARROW_NATURAL_WIDTH: f64 = 0.15625;
/// Line width the board uses for an arrow while it's being drawn.
pub const ARROW_CURRENT_WIDTH: f64 = 0.1328125;
pub const ARROW_VIEW_BOX: &str = "-0.5 -0.5 8 8";
pub const ARROWHEAD_PATH: &str = "M0,0 V4 L3,2 Z";
pub const ARROWHEAD_MARKER_WIDTH: &str = "4";
pub const ARROWHEAD_MARKER_HEIGHT: &str = "8";
pub const ARROWHEAD_REF_X: &str = "2.05";
pub const ARROWHEAD_REF_Y: &str = "2.01";

// MASKS
/// Color matrix that turns every visible pixel of a piece image solid black while keeping its alpha.
pub const TO_BLACK_MATRIX: &str = "
0 0 0 0 0
0 0 0 0 0
0 0 0 0 0
0 0 0 1 0";

// UPSTREAM MARKUP
pub const CONTAINER_TAG: &str = "cg-container";
pub const BOARD_TAG: &str = "cg-board";
pub const SHAPES_CLASS: &str = "cg-shapes";
pub const PIECE_TAG: &str = "piece";
pub const FLIPPED_ORIENTATION_CLASS: &str = "orientation-black";
pub const SHAPE_HASH_ATTRIBUTE: &str = "cgHash";

// PRODUCED MARKUP
pub const HIGHLIGHTS_CLASS: &str = "fancyground-highlights";
pub const HIGHLIGHT_TAG: &str = "highlight";
pub const ARROWS_CLASS: &str = "fancyground-arrows";
pub const PALETTE_INDEX_ATTRIBUTE: &str = "data-color-num";
pub const SQUARE_ATTRIBUTE: &str = "data-key";
