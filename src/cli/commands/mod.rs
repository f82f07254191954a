pub mod context;
pub mod directory;
pub mod draft;
pub mod folder;
pub mod presets;
