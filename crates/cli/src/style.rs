//! Terminal styling helpers.

use console::Style;

/// Green checkmark prefix.
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Red cross prefix.
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Yellow warning prefix.
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Bold text.
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Dimmed text.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// A roster line the file is missing.
pub fn added(identity: &str) -> String {
    let style = Style::new().green();
    style.apply_to(format!("+ {}", identity)).to_string()
}

/// A roster line the file should not have.
pub fn removed(identity: &str) -> String {
    let style = Style::new().red();
    style.apply_to(format!("- {}", identity)).to_string()
}
