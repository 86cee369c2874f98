use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_INPUT: &str = "input.fal";
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Settings read from `--config` YAML. Every field is optional and
/// command-line flags win over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: Option<String>,
    pub output: Option<String>,
    pub preprocessed: Option<String>,
    pub label: Option<String>,
    pub append_halt: Option<bool>,
    pub dump: Option<bool>,
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Fields set in `top` replace ours.
    pub fn overlay(self, top: Config) -> Self {
        Config {
            input: top.input.or(self.input),
            output: top.output.or(self.output),
            preprocessed: top.preprocessed.or(self.preprocessed),
            label: top.label.or(self.label),
            append_halt: top.append_halt.or(self.append_halt),
            dump: top.dump.or(self.dump),
        }
    }

    pub fn input(&self) -> &str {
        self.input.as_deref().unwrap_or(DEFAULT_INPUT)
    }

    pub fn output(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(prom::DEFAULT_LABEL)
    }

    pub fn append_halt(&self) -> bool {
        self.append_halt.unwrap_or(false)
    }

    pub fn dump(&self) -> bool {
        self.dump.unwrap_or(false)
    }
}

/// `prog.fal` -> `prog_preprocessed.fal`
pub fn preprocessed_path(input: &str) -> String {
    let path = Path::new(input);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("input");
    let name = format!("{}_preprocessed.fal", stem);
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.join(name).to_string_lossy().into_owned(),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.input(), "input.fal");
        assert_eq!(cfg.output(), "output.txt");
        assert_eq!(cfg.label(), "Program - PROM");
        assert!(!cfg.append_halt());
    }

    #[test]
    fn yaml_fields() {
        let cfg = Config::from_yaml("input: prog.fal\nappend_halt: true\nlabel: Demo\n").unwrap();
        assert_eq!(cfg.input(), "prog.fal");
        assert!(cfg.append_halt());
        assert_eq!(cfg.label(), "Demo");
        assert!(Config::from_yaml("colour: red\n").is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = Config::from_yaml("input: a.fal\noutput: a.txt\n").unwrap();
        let cli = Config {
            output: Some("b.txt".into()),
            ..Config::default()
        };
        let cfg = file.overlay(cli);
        assert_eq!(cfg.input(), "a.fal");
        assert_eq!(cfg.output(), "b.txt");
    }

    #[test]
    fn preprocessed_next_to_input() {
        assert_eq!(preprocessed_path("input.fal"), "input_preprocessed.fal");
        assert_eq!(preprocessed_path("src/prog.fal"), "src/prog_preprocessed.fal");
    }
}
