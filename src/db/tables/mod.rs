//! Database table operations

mod activity_log_table;
mod genre_table;
mod playlist_table;
mod user_table;

pub use activity_log_table::ActivityLogTable;
pub use genre_table::GenreTable;
pub use playlist_table::PlaylistTable;
pub use user_table::{PreferenceList, UserTable};
