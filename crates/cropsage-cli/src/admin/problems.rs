use clap::{Args, Subcommand};
use cropsage_api::AdminSession;
use cropsage_core::Problem;

/// Sub-commands available under `admin problems`.
#[derive(Debug, Subcommand)]
pub enum ProblemCommands {
    /// List every problem
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a problem
    Add(NewProblem),
    /// Change fields of an existing problem; list flags replace the whole list
    Update {
        id: i64,
        #[command(flatten)]
        patch: ProblemPatch,
    },
    /// Delete a problem
    Delete { id: i64 },
}

#[derive(Debug, Clone, Args)]
pub struct NewProblem {
    #[arg(long)]
    pub name: String,
    /// Alternative name (repeatable)
    #[arg(long = "alias")]
    pub aliases: Vec<String>,
    /// Observed symptom (repeatable)
    #[arg(long = "symptom")]
    pub symptoms: Vec<String>,
    /// Remedy, in display order (repeatable)
    #[arg(long = "remedy")]
    pub remedies: Vec<String>,
    #[arg(long, default_value = "medium")]
    pub severity: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub causes: Option<String>,
}

impl From<NewProblem> for Problem {
    fn from(args: NewProblem) -> Self {
        Problem {
            id: None,
            name: args.name,
            aliases: args.aliases,
            symptoms: args.symptoms,
            remedies: args.remedies,
            severity: args.severity,
            description: args.description,
            causes: args.causes,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProblemPatch {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "alias")]
    pub aliases: Vec<String>,
    #[arg(long = "symptom")]
    pub symptoms: Vec<String>,
    #[arg(long = "remedy")]
    pub remedies: Vec<String>,
    #[arg(long)]
    pub severity: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub causes: Option<String>,
}

impl ProblemPatch {
    fn apply(self, problem: &mut Problem) {
        if let Some(name) = self.name {
            problem.name = name;
        }
        if !self.aliases.is_empty() {
            problem.aliases = self.aliases;
        }
        if !self.symptoms.is_empty() {
            problem.symptoms = self.symptoms;
        }
        if !self.remedies.is_empty() {
            problem.remedies = self.remedies;
        }
        if let Some(severity) = self.severity {
            problem.severity = severity;
        }
        if self.description.is_some() {
            problem.description = self.description;
        }
        if self.causes.is_some() {
            problem.causes = self.causes;
        }
    }
}

/// # Errors
///
/// Returns an error if the problem does not exist or a backend call fails.
pub(crate) async fn run_problems(
    session: &mut AdminSession,
    command: ProblemCommands,
) -> anyhow::Result<()> {
    match command {
        ProblemCommands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.problems())?);
                return Ok(());
            }
        }
        ProblemCommands::Add(args) => {
            let saved = session.save_problem(&Problem::from(args)).await?;
            println!("added problem '{}'", saved.name);
        }
        ProblemCommands::Update { id, patch } => {
            let mut problem = session
                .problems()
                .iter()
                .find(|p| p.id == Some(id))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("problem {id} not found"))?;
            patch.apply(&mut problem);
            let saved = session.save_problem(&problem).await?;
            println!("updated problem '{}'", saved.name);
        }
        ProblemCommands::Delete { id } => {
            session.delete_problem(id).await?;
            println!("deleted problem {id}");
        }
    }

    print_problems(session.problems());
    Ok(())
}

fn print_problems(problems: &[Problem]) {
    if problems.is_empty() {
        println!("no problems defined");
        return;
    }

    let header = format!("{:<6}{:<30}{:<10}REMEDIES", "ID", "NAME", "SEVERITY");
    println!("{header}");
    for problem in problems {
        let id = problem.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        println!(
            "{:<6}{:<30}{:<10}{}",
            id,
            super::clip(&problem.name, 28),
            problem.severity,
            super::clip(&problem.remedies.join("; "), 60)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_keeps_fields_that_were_not_given() {
        let mut problem = Problem::named("Leaf Blight");
        problem.id = Some(4);
        problem.remedies = vec!["Spray copper".to_string()];
        problem.description = Some("brown lesions".to_string());

        ProblemPatch {
            severity: Some("high".to_string()),
            symptoms: vec!["brown spots".to_string()],
            ..ProblemPatch::default()
        }
        .apply(&mut problem);

        assert_eq!(problem.name, "Leaf Blight");
        assert_eq!(problem.severity, "high");
        assert_eq!(problem.symptoms, vec!["brown spots"]);
        assert_eq!(problem.remedies, vec!["Spray copper"]);
        assert_eq!(problem.description.as_deref(), Some("brown lesions"));
    }

    #[test]
    fn new_problem_has_no_id() {
        let problem = Problem::from(NewProblem {
            name: "Rust".to_string(),
            aliases: vec![],
            symptoms: vec![],
            remedies: vec!["Remove infected leaves".to_string()],
            severity: "medium".to_string(),
            description: None,
            causes: None,
        });
        assert_eq!(problem.id, None);
        assert_eq!(problem.remedies, vec!["Remove infected leaves"]);
    }
}
