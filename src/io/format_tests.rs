use std::fmt;

use super::{nice_bool, subtitle_lines, title_lines, write_subtitle, TITLE_WIDTH};

struct Headed(&'static str);

impl fmt::Display for Headed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, self.0)?;
        writeln!(f, "body")
    }
}

#[test]
fn test_format_title_lines() {
    let [top, middle, bottom] = title_lines("Site analysis");
    assert_eq!(top.chars().count(), TITLE_WIDTH + 6);
    assert_eq!(middle.chars().count(), TITLE_WIDTH + 6);
    assert_eq!(bottom.chars().count(), TITLE_WIDTH + 6);
    assert!(middle.starts_with("│§ ") && middle.ends_with(" §│"));
    assert!(middle.contains("Site analysis"));

    let long = "x".repeat(TITLE_WIDTH + 10);
    let [top, middle, _] = title_lines(&long);
    assert_eq!(top.chars().count(), long.len() + 6);
    assert_eq!(middle, format!("│§ {long} §│"));
}

#[test]
fn test_format_subtitles() {
    assert_eq!(subtitle_lines("Orbits"), ["Orbits".to_string(), "══════".to_string()]);
    assert_eq!(Headed("Ré").to_string(), "Ré\n══\nbody\n");
    assert_eq!(nice_bool(true), "yes");
    assert_eq!(nice_bool(false), "no");
}
