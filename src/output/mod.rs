pub mod formatter;

pub use formatter::{
    format_completion, format_entry_detail, format_points, format_progression, format_round,
    format_standings, should_use_colors,
};
