use crate::{error::Category, token::Site};
use color_print::{cformat, cprintln};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Error(Option<Category>, String),
    Warn(String),
    Note(String),
}

impl Msg {
    /// Header line followed by the source excerpt with a caret under `site`.
    pub fn render(&self, file: &str, site: Option<&Site>) -> String {
        let mut out = match self {
            Msg::Error(Some(cat), msg) => cformat!("<red,bold>error[{}]</>: {}\n", cat, msg),
            Msg::Error(None, msg) => cformat!("<red,bold>error</>: {}\n", msg),
            Msg::Warn(msg) => cformat!("<yellow,bold>warn</>: {}\n", msg),
            Msg::Note(msg) => cformat!("<green,bold>note</>: {}\n", msg),
        };
        if let Some(site) = site.filter(|s| !s.is_synthetic()) {
            out += &cformat!("     <blue>--></> <underline>{}:{}:{}</>\n", file, site.line, site.col + 1);
            out += &cformat!("      <blue>|</>\n");
            out += &cformat!(" <blue>{:>4} |</> {}\n", site.line, site.raw);
            out += &cformat!("      <blue>|</> <red,bold>{}</>\n", caret(site));
        }
        out
    }

    pub fn print(&self, file: &str, site: Option<&Site>) {
        print!("{}", self.render(file, site));
    }
}

/// Spaces up to the column, then `^`.
pub fn caret(site: &Site) -> String {
    format!("{}^", " ".repeat(site.col))
}

pub fn step(n: usize, title: &str) {
    cprintln!("<green,bold>{}.</> {}", n, title);
}

pub fn detail(text: &str) {
    cprintln!("   <blue>-</> {}", text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn caret_points_at_column() {
        let site = Site::new(3, 4, Rc::from("MOV R0, 5"));
        assert_eq!(caret(&site), "    ^");
    }

    #[test]
    fn render_shows_location_and_source() {
        let site = Site::new(12, 0, Rc::from("FOO R1"));
        let text = Msg::Warn("something odd".into()).render("prog.fal", Some(&site));
        assert!(text.contains("something odd"));
        assert!(text.contains("prog.fal:12:1"));
        assert!(text.contains("FOO R1"));
    }

    #[test]
    fn synthetic_site_has_no_excerpt() {
        let text = Msg::Note("appended".into()).render("prog.fal", Some(&Site::synthetic()));
        assert!(!text.contains("prog.fal"));
    }
}
