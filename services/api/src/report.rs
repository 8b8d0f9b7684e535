use clap::Args;
use futurewife::error::AppError;
use futurewife::quiz::{catalog::catalog, Category, Evaluation, QuizSubmission, ScoringEngine};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file shaped like the /api/score request body
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the raw evaluation as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let submission = load_submission(&args.answers)?;
    let evaluation = ScoringEngine::default().evaluate(&submission.answers);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        let report = ReportView {
            name: submission.name.as_deref(),
            evaluation: &evaluation,
        };
        print!("{report}");
    }
    Ok(())
}

pub(crate) fn print_catalog() -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(&catalog())?);
    Ok(())
}

pub(crate) fn load_submission(path: &Path) -> Result<QuizSubmission, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Trust => "Fiducia",
        Category::Vision => "Visione",
        Category::EmotionalMaturity => "Maturità emotiva",
        Category::Ambition => "Allineamento ambizione",
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "\n{title}")?;
    for item in items {
        writeln!(f, "- {item}")?;
    }
    Ok(())
}

/// Plain-text rendering of an evaluation for the `score` command.
pub(crate) struct ReportView<'a> {
    pub(crate) name: Option<&'a str>,
    pub(crate) evaluation: &'a Evaluation,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let evaluation = self.evaluation;
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("anonimo");

        writeln!(f, "Valutazione per {name}")?;
        writeln!(
            f,
            "Punteggio {}/100 ({})",
            evaluation.final_score,
            evaluation.compatibility_level.label()
        )?;
        writeln!(f, "{}", evaluation.verdict)?;

        writeln!(f, "\nIndici")?;
        for category in Category::ALL {
            writeln!(
                f,
                "- {}: {:.1}/10",
                category_label(category),
                evaluation.index(category)
            )?;
        }

        writeln!(f, "\nPunti")?;
        for entry in &evaluation.points_breakdown {
            writeln!(
                f,
                "- {}: {} ({:+.1} punti, {})",
                entry.question, entry.answer, entry.points, entry.reason
            )?;
        }

        write_section(f, "Punti di forza", &evaluation.strengths)?;
        write_section(f, "Criticità", &evaluation.concerns)?;
        if !evaluation.red_flags.is_empty() {
            write_section(f, "Red flags", &evaluation.red_flags)?;
        }

        writeln!(f, "\n{}", evaluation.final_message)
    }
}
