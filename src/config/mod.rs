pub mod core;
pub mod rendering;
pub mod window;

pub use self::core::{default_config_path, load_or_create_config, AppConfig};
pub use rendering::RenderConfig;
pub use window::WindowConfig;
