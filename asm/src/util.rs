use crate::inst::Instruction;
use arch::Signals;
use color_print::{cformat, cprintln};

/// Preprocessed listing, one instruction per line.
pub fn listing(insts: &[Instruction]) -> String {
    insts.iter().map(|i| format!("{}\n", i)).collect()
}

pub fn print_dump(insts: &[Instruction], signals: &[Signals]) {
    println!("{}+------------------------------------------------------", "-".repeat(12));
    for (addr, (inst, sigs)) in insts.iter().zip(signals).enumerate() {
        let line = if inst.site().is_synthetic() {
            "    ".to_string()
        } else {
            format!("{:>4}", inst.site().line)
        };
        let values: Vec<String> = sigs
            .iter()
            .map(|(name, v)| cformat!("<c>{}</>={}", short(name), v))
            .collect();
        cprintln!(
            "[<y>{:04}</>] {} | <s>{:<24}</> {}",
            addr,
            line,
            inst.to_string(),
            values.join(" ")
        );
    }
    println!("{}+------------------------------------------------------", "-".repeat(12));
}

/// `signal-U` -> `U`
fn short(name: &str) -> &str {
    name.strip_prefix("signal-").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_ends_every_line() {
        let insts = vec![Instruction::halt(), Instruction::halt()];
        assert_eq!(listing(&insts), "HLTG \nHLTG \n");
    }

    #[test]
    fn short_names() {
        assert_eq!(short("signal-U"), "U");
        assert_eq!(short("copper-plate"), "copper-plate");
    }
}
