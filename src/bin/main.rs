//! script_report: one character report per invocation.

use clap::{Parser, Subcommand};
use crossterm::style::Color;
use script_core::config::{default_config_path, AnalysisConfig};
use script_core::emotion::{character_emotions, script_emotions, ProcessClassifier};
use script_core::export::{save_report, ExportFormat};
use script_core::report::ReportKind;
use script_core::sentiment::{sentiment_clouds, LexiconScorer};
use script_core::{logging, render, AnalysisError, Result, ScriptAnalyzer};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "script_report")]
#[command(about = "Character statistics for a movie script CSV")]
#[command(version)]
struct Cli {
    /// Script CSV with Scene_Characters and Scene_Dialogue columns
    #[arg(short, long, env = "SCRIPT_CSV")]
    csv: PathBuf,

    /// JSON config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Restrict character and pair reports to these names (repeatable)
    #[arg(long = "only", global = true)]
    only: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct character names found in the scene lists
    Names,

    /// Count dialogue mentions of one character
    Dialogue { name: String },

    /// Count scenes featuring one character
    Scenes { name: String },

    /// Bar chart of dialogue counts
    DialogueChart,

    /// Bar chart of scene counts
    SceneChart,

    /// Every co-occurring pair with its count
    Interactions,

    /// Relationship list, or one character's partners
    Relationships { name: Option<String> },

    /// The most frequent pairs
    TopPairs {
        #[arg(short, long)]
        n: Option<usize>,
    },

    /// Shared scenes of two characters
    Lookup { a: String, b: String },

    /// Positive and negative word clouds over all dialogue
    Wordcloud {
        /// VADER-format lexicon (overrides the config)
        #[arg(long)]
        lexicon: Option<PathBuf>,

        #[arg(long, default_value = "30")]
        limit: usize,
    },

    /// Emotions of the whole script or of one character's scenes
    Emotions {
        #[arg(long)]
        character: Option<String>,

        /// Classifier command line as one string (overrides the config),
        /// e.g. --classifier "python3 classify.py"
        #[arg(long)]
        classifier: Option<String>,
    },

    /// Write a report to disk (.bin for binary, JSON otherwise)
    Export {
        output: PathBuf,

        /// scenes, dialogue, pairs, top or top:N
        #[arg(long, default_value = "scenes")]
        kind: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path),
        None => match default_config_path() {
            Some(path) => AnalysisConfig::from_file_or_default(&path),
            None => Ok(AnalysisConfig::default()),
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let analyzer = ScriptAnalyzer::new(config);
    let table = analyzer.load(&cli.csv)?;
    let config = analyzer.config();
    let subset = (!cli.only.is_empty()).then_some(cli.only.as_slice());
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Names => {
            let names = table.character_names();
            render::heading(&mut out, "Character Names")?;
            writeln!(out, "Total Characters: {}", names.len())?;
            for name in names {
                writeln!(out, "  {}", name)?;
            }
        }
        Commands::Dialogue { name } => {
            writeln!(out, "Total dialogues for {}: {}", name, table.dialogue_mentions(&name))?;
        }
        Commands::Scenes { name } => {
            writeln!(out, "Total scenes for {}: {}", name, table.scenes_featuring(&name))?;
        }
        Commands::DialogueChart => {
            let analysis = analyzer.analyze(&table);
            render::report_chart(&mut out, &analysis.report(ReportKind::DialogueCounts, subset))?;
        }
        Commands::SceneChart => {
            let analysis = analyzer.analyze(&table);
            render::report_chart(&mut out, &analysis.report(ReportKind::SceneCounts, subset))?;
        }
        Commands::Interactions => {
            let analysis = analyzer.analyze(&table);
            render::report_table(&mut out, &analysis.report(ReportKind::CoOccurrence, subset))?;
        }
        Commands::Relationships { name: Some(name) } => {
            let analysis = analyzer.analyze(&table);
            let partners = analysis.graph.partners(&name);
            render::bar_chart(&mut out, &format!("Scenes shared with {}", name), &partners)?;
        }
        Commands::Relationships { name: None } => {
            let analysis = analyzer.analyze(&table);
            let pairs: Vec<(String, u64)> = analysis
                .graph
                .unordered_pairs()
                .into_iter()
                .map(|(key, count)| (format!("{} - {}", key.a, key.b), count))
                .collect();
            render::table(&mut out, "Character Relationships", &pairs)?;
        }
        Commands::TopPairs { n } => {
            let analysis = analyzer.analyze(&table);
            let kind = ReportKind::TopPairs { n: n.unwrap_or(config.top_n) };
            render::report_chart(&mut out, &analysis.report(kind, subset))?;
        }
        Commands::Lookup { a, b } => {
            let analysis = analyzer.analyze(&table);
            writeln!(out, "{} and {} share {} scenes", a, b, analysis.graph.lookup(&a, &b))?;
        }
        Commands::Wordcloud { lexicon, limit } => {
            let scorer = match lexicon.as_deref().or(config.lexicon_path.as_deref()) {
                Some(path) => LexiconScorer::from_path(path)?,
                None => LexiconScorer::builtin(),
            };
            let clouds = sentiment_clouds(&table.dialogue_blob(), &scorer);
            render::word_cloud(&mut out, "Positive Words", &clouds.positive, Color::Green, limit)?;
            render::word_cloud(&mut out, "Negative Words", &clouds.negative, Color::Red, limit)?;
        }
        Commands::Emotions { character, classifier } => {
            let command = match classifier {
                Some(line) => line.split_whitespace().map(str::to_string).collect(),
                None => config.emotion_command.clone().ok_or_else(|| {
                    AnalysisError::Config(
                        "no emotion classifier: pass --classifier or set emotion_command"
                            .to_string(),
                    )
                })?,
            };
            let classifier = ProcessClassifier::from_command(&command)?;
            match character {
                Some(name) => {
                    let scores = character_emotions(&table, &name, &classifier)?;
                    render::emotions(&mut out, &format!("Emotions for {}", name), &scores)?;
                }
                None => {
                    let scores = script_emotions(&table, &classifier)?;
                    render::emotions(&mut out, "Overall Emotions in the Movie", &scores)?;
                }
            }
        }
        Commands::Export { output, kind } => {
            let kind = ReportKind::parse_with_top_n(&kind, config.top_n)?;
            let analysis = analyzer.analyze(&table);
            let report = analysis.report(kind, subset);
            save_report(&report, &output, ExportFormat::from_path(&output))?;
            writeln!(out, "Saved {} rows to {}", report.rows.len(), output.display())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init_logger();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = render::error(&mut io::stderr(), &format!("[ERROR] {}", e));
            ExitCode::FAILURE
        }
    }
}
