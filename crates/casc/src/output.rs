//! Terminal output utilities

use console::style;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print a sorted id list under a header, one id per line
pub fn id_list<'a>(title: &str, ids: impl IntoIterator<Item = &'a String>) {
    header(title);
    let mut empty = true;
    for id in ids {
        println!("  {}", id);
        empty = false;
    }
    if empty {
        println!("  {}", style("(none)").dim());
    }
}
