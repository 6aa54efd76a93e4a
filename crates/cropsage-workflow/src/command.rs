//! Command-line templates for external speech programs.
//!
//! A template is a whitespace-separated program and argument list in which
//! `{locale}`, `{lang}`, `{rate}`, `{pitch}` and `{text}` are substituted per
//! invocation, e.g. `espeak-ng -v {lang} {text}`.

/// A parsed program-plus-arguments template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Parses a template; `None` when it contains no program.
    #[must_use]
    pub fn parse(template: &str) -> Option<Self> {
        let mut parts = template.split_whitespace().map(str::to_owned);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether any argument mentions `{name}`.
    #[must_use]
    pub fn uses(&self, name: &str) -> bool {
        let placeholder = format!("{{{name}}}");
        self.args.iter().any(|a| a.contains(&placeholder))
    }

    /// Arguments with every `{name}` replaced by its value.
    #[must_use]
    pub fn render_args(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (name, value)| {
                    acc.replace(&format!("{{{name}}}"), value)
                })
            })
            .collect()
    }

    /// A `tokio` command ready to spawn with the rendered arguments.
    #[must_use]
    pub fn command(&self, vars: &[(&str, &str)]) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(self.render_args(vars));
        command
    }
}
