//! `Text.tellraw`.

use quill_foundation::{Command, Error, Result};

use super::Bound;
use crate::compiler::Compiler;

impl Compiler {
    pub(super) fn text_tellraw(&mut self, args: &Bound, out: &mut Vec<Command>) -> Result<()> {
        let selector = args.text("selector")?;
        let message = args.text("message")?;
        let json = serde_json::to_string(message)
            .map_err(|err| Error::internal(format!("cannot encode tellraw message: {err}")))?;
        out.push(Command::new(format!("tellraw {selector} {json}")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::compile;
    use crate::config::CompilerConfig;

    #[test]
    fn message_is_json_escaped() {
        let pack = compile(
            "main.quill",
            r#"Text.tellraw(@a[tag=red], "say \"hi\"\nbye");"#,
            CompilerConfig::new(),
        )
        .unwrap();
        assert_eq!(
            pack.load_function().unwrap().commands()[0].as_str(),
            r#"tellraw @a[tag=red] "say \"hi\"\nbye""#
        );
    }

    #[test]
    fn selector_is_checked() {
        let err = compile("main.quill", "Text.tellraw(\"@a\", hi);", CompilerConfig::new()).unwrap_err();
        assert!(err.is_semantic());
    }
}
