//! Stylesheets injected into the hosted card-entry page

use crate::session::Theme;

const BASE_CSS: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 16px; }
input, select { border-radius: 6px; padding: 10px 12px; font-size: 15px; }
button, input[type=submit] { border: none; border-radius: 6px; padding: 10px 20px; font-weight: 600; cursor: pointer; }
";

const LIGHT_CSS: &str = "\
body { background: #ffffff; color: #212529; }
input, select { background: #ffffff; color: #212529; border: 1px solid #ced4da; }
button, input[type=submit] { background: #0d6efd; color: #ffffff; }
";

const DARK_CSS: &str = "\
body { background: #1e1e2e; color: #e0e0e0; }
input, select { background: #2a2a3c; color: #e0e0e0; border: 1px solid #44445a; }
button, input[type=submit] { background: #7aa2f7; color: #1e1e2e; }
label { color: #b8b8c8; }
";

/// Full stylesheet for a theme
pub fn stylesheet(theme: Theme) -> String {
    let overrides = match theme {
        Theme::Light => LIGHT_CSS,
        Theme::Dark => DARK_CSS,
    };
    format!("{BASE_CSS}{overrides}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_specific_rules() {
        assert!(stylesheet(Theme::Dark).contains("#1e1e2e"));
        assert!(!stylesheet(Theme::Light).contains("#1e1e2e"));
        assert!(stylesheet(Theme::Light).starts_with("body"));
    }
}
