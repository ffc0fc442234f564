//! `Particle.circle`.

use std::f64::consts::TAU;

use quill_foundation::{Command, Error, Result};

use super::Bound;
use crate::compiler::Compiler;

/// Upper bound on `spread`; each point is one command.
const MAX_SPREAD: i64 = 360;

/// Local coordinate with at most three decimals; zero renders empty.
fn coordinate(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "0" | "-0" => String::new(),
        _ => text.to_string(),
    }
}

impl Compiler {
    pub(super) fn particle_circle(&mut self, args: &Bound, out: &mut Vec<Command>) -> Result<()> {
        let particle = args.text("particle")?;
        let radius = args.number("radius")?;
        let spread = args.int("spread")?;
        if !(1..=MAX_SPREAD).contains(&spread) {
            return Err(Error::semantic(format!(
                "Particle.circle: spread must be between 1 and {MAX_SPREAD}, got {spread}"
            ))
            .with_location(args.location("spread")));
        }
        let points = u32::try_from(spread).map_err(|_| Error::internal("spread out of range"))?;
        for point in 0..points {
            let angle = TAU * f64::from(point) / f64::from(points);
            let x = coordinate(radius * angle.cos());
            let z = coordinate(radius * angle.sin());
            out.push(Command::new(format!("particle {particle} ^{x} ^ ^{z}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::coordinate;
    use crate::compiler::compile;
    use crate::config::CompilerConfig;

    #[test]
    fn coordinates_are_trimmed() {
        assert_eq!(coordinate(1.0), "1");
        assert_eq!(coordinate(0.70710678), "0.707");
        assert_eq!(coordinate(-0.0000001), "");
        assert_eq!(coordinate(2.5), "2.5");
    }

    #[test]
    fn four_point_circle() {
        let pack = compile(
            "main.quill",
            "Particle.circle(flame, radius=2, spread=4);",
            CompilerConfig::new(),
        )
        .unwrap();
        let lines: Vec<&str> = pack.load_function().unwrap().commands().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "particle flame ^2 ^ ^",
                "particle flame ^ ^ ^2",
                "particle flame ^-2 ^ ^",
                "particle flame ^ ^ ^-2",
            ]
        );
    }

    #[test]
    fn default_spread_is_eight() {
        let pack = compile("main.quill", "Particle.circle(\"end_rod\");", CompilerConfig::new()).unwrap();
        assert_eq!(pack.load_function().unwrap().len(), 8);
    }

    #[test]
    fn spread_must_be_positive() {
        let err = compile("main.quill", "Particle.circle(flame, spread=0);", CompilerConfig::new()).unwrap_err();
        assert!(err.is_semantic());
    }
}
