pub mod folder;
pub mod note;
pub mod preferences;
pub mod widget_config;

pub use folder::Folder;
pub use note::{Note, NoteDraft, NotePatch};
pub use preferences::{AccentColor, ThemePreference};
pub use widget_config::{SeedFolder, WidgetConfig};
