use crate::config::Settings;

/// Load and validate settings. Configuration is optional: an unreadable or
/// invalid file falls back to defaults with a logged warning rather than
/// preventing startup.
pub fn load_settings() -> Settings {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("cannot load config, using defaults: {e}");
            return Settings::default();
        }
    };
    if let Err(msg) = settings.validate() {
        log::warn!("invalid config, using defaults: {msg}");
        return Settings::default();
    }
    settings
}
