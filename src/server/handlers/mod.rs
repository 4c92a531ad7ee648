pub mod collections;
pub mod designs;
pub mod files;
pub mod health;
pub mod orders;
pub mod partners;
pub mod prompt_templates;
pub mod render_assets;
pub mod upload;
