pub mod compositor;
pub mod consoles;
pub mod error;

pub use compositor::{CORNER_RADIUS, composite, decode_icon, overlay_path, save_png};
pub use consoles::{list_consoles, refresh_selection, validate_console_selection};
pub use error::OverlayError;
