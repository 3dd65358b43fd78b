//! Theme stylesheet emission

use crate::config::Config;
use std::path::Path;

/// Writes `html/assets/theme.css` from the configured colors
///
/// Skipped entirely when any color is unset, leaving the default theme in
/// place. Regenerated on every server start.
pub fn write_theme(config: &Config, assets_dir: &Path) -> std::io::Result<()> {
    let theme = &config.theme;
    if theme.foreground.is_empty() || theme.background.is_empty() || theme.links.is_empty() {
        return Ok(());
    }

    let css = format!(
        "/* This file is regenerated on startup when theme colors are set in the configuration */\n\
         :root {{\n  --primary: {};\n  --secondary: {};\n  --link: {};\n}}\n",
        theme.foreground, theme.background, theme.links
    );

    std::fs::create_dir_all(assets_dir)?;
    std::fs::write(assets_dir.join("theme.css"), css)
}
