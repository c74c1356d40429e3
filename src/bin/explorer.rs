use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Color;
use crossterm::terminal::{Clear, ClearType};
use script_core::config::{default_config_path, AnalysisConfig};
use script_core::emotion::{character_emotions, script_emotions, ProcessClassifier};
use script_core::report::ReportKind;
use script_core::sentiment::{sentiment_clouds, LexiconScorer, PolarityScorer};
use script_core::{
    logging, render, AnalysisError, Result, ScriptAnalysis, ScriptAnalyzer, ScriptTable,
};
use std::io::{self, stdin, Write};
use std::path::PathBuf;

const CLOUD_WORDS: usize = 20;

#[derive(Parser)]
#[command(name = "script_explorer")]
#[command(about = "Browse character statistics of a movie script CSV page by page")]
struct Args {
    /// Script CSV with Scene_Characters and Scene_Dialogue columns
    csv: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    WordCloud,
    CharacterNames,
    DialogueCount,
    SceneCount,
    DialogueChart,
    SceneChart,
    Interactions,
    Relationships,
    CharacterEmotions,
    TextEmotions,
}

const PAGES: [Page; 10] = [
    Page::WordCloud,
    Page::CharacterNames,
    Page::DialogueCount,
    Page::SceneCount,
    Page::DialogueChart,
    Page::SceneChart,
    Page::Interactions,
    Page::Relationships,
    Page::CharacterEmotions,
    Page::TextEmotions,
];

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::WordCloud => "Word Cloud",
            Page::CharacterNames => "Character Names",
            Page::DialogueCount => "Character Dialogue Counts",
            Page::SceneCount => "Character Scene Counts",
            Page::DialogueChart => "Bar Graph on Dialogue Count",
            Page::SceneChart => "Bar Graph on Scene Count",
            Page::Interactions => "Character Interactions",
            Page::Relationships => "Character Relationships",
            Page::CharacterEmotions => "Character Emotion Analysis",
            Page::TextEmotions => "Text Emotion Analysis",
        }
    }

    fn needs_name(self) -> bool {
        matches!(self, Page::DialogueCount | Page::SceneCount | Page::CharacterEmotions)
    }
}

// Everything one browsing session holds; dropped when the session ends.
struct Session {
    config: AnalysisConfig,
    table: ScriptTable,
    analysis: ScriptAnalysis,
    scorer: Box<dyn PolarityScorer>,
}

impl Session {
    fn open(args: &Args) -> Result<Self> {
        let config = match (&args.config, default_config_path()) {
            (Some(path), _) => AnalysisConfig::load(path)?,
            (None, Some(path)) => AnalysisConfig::from_file_or_default(&path)?,
            (None, None) => AnalysisConfig::default(),
        };
        let analyzer = ScriptAnalyzer::new(config);
        let (table, analysis) = analyzer.analyze_path(&args.csv)?;
        let config = analyzer.config().clone();
        let scorer: Box<dyn PolarityScorer> = match &config.lexicon_path {
            Some(path) => Box::new(LexiconScorer::from_path(path)?),
            None => Box::new(LexiconScorer::builtin()),
        };
        Ok(Self { config, table, analysis, scorer })
    }

    fn classifier(&self) -> Result<ProcessClassifier> {
        let command = self.config.emotion_command.as_deref().ok_or_else(|| {
            AnalysisError::Config(
                "set emotion_command in the config to use emotion pages".to_string(),
            )
        })?;
        ProcessClassifier::from_command(command)
    }

    fn show(&self, page: Page, name: &str, out: &mut impl Write) -> Result<()> {
        match page {
            Page::WordCloud => {
                let clouds = sentiment_clouds(&self.table.dialogue_blob(), self.scorer.as_ref());
                let (positive, negative) = (&clouds.positive, &clouds.negative);
                render::word_cloud(out, "Positive Words", positive, Color::Green, CLOUD_WORDS)?;
                render::word_cloud(out, "Negative Words", negative, Color::Red, CLOUD_WORDS)?;
            }
            Page::CharacterNames => {
                let names = self.table.character_names();
                writeln!(out, "Total Characters: {}", names.len())?;
                writeln!(out, "{}", names.join(", "))?;
            }
            Page::DialogueCount => {
                let count = self.table.dialogue_mentions(name);
                writeln!(out, "Total dialogues for {}: {}", name, count)?;
            }
            Page::SceneCount => {
                writeln!(out, "Total scenes for {}: {}", name, self.table.scenes_featuring(name))?;
            }
            Page::DialogueChart => {
                render::report_chart(out, &self.analysis.report(ReportKind::DialogueCounts, None))?;
            }
            Page::SceneChart => {
                render::report_chart(out, &self.analysis.report(ReportKind::SceneCounts, None))?;
            }
            Page::Interactions => {
                render::report_table(out, &self.analysis.report(ReportKind::CoOccurrence, None))?;
            }
            Page::Relationships => {
                let kind = ReportKind::TopPairs { n: self.config.top_n };
                render::report_chart(out, &self.analysis.report(kind, None))?;
            }
            Page::CharacterEmotions => {
                let scores = character_emotions(&self.table, name, &self.classifier()?)?;
                render::emotions(out, &format!("Emotions for {}", name), &scores)?;
            }
            Page::TextEmotions => {
                let scores = script_emotions(&self.table, &self.classifier()?)?;
                render::emotions(out, "Overall Emotions in the Movie", &scores)?;
            }
        }
        Ok(())
    }
}

fn print_menu(out: &mut impl Write, args: &Args, session: &Session) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(out, "Film Pre-Production Analysis")?;
    writeln!(out, "---------------------------------------------------------------")?;
    writeln!(
        out,
        "Script: {} ({} scenes, {} characters)",
        args.csv.display(),
        session.table.len(),
        session.analysis.characters().len()
    )?;
    writeln!(out, "Pick a page by number, add a name for character pages (e.g. '3 Wade').")?;
    writeln!(out, "'exit' to quit.\n")?;
    for (i, page) in PAGES.iter().enumerate() {
        writeln!(out, "  {:>2}: {}", i + 1, page.title())?;
    }
    write!(out, "\n> ")?;
    out.flush()
}

fn main() {
    logging::init_logger();
    let args = Args::parse();

    let session = match Session::open(&args) {
        Ok(session) => session,
        Err(e) => {
            let message = format!("[ERROR] Could not open script: {}", e);
            let _ = render::error(&mut io::stderr(), &message);
            std::process::exit(1);
        }
    };

    let mut out = io::stdout();
    loop {
        if print_menu(&mut out, &args, &session).is_err() {
            break;
        }

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let cmd = input.trim();
        if cmd == "exit" {
            break;
        }

        let (number, name) = match cmd.split_once(' ') {
            Some((number, name)) => (number, name.trim()),
            None => (cmd, ""),
        };
        let page = match number.parse::<usize>() {
            Ok(n) if n > 0 && n <= PAGES.len() => PAGES[n - 1],
            _ => continue,
        };

        let _ = render::heading(&mut out, page.title());
        let shown = if page.needs_name() && name.is_empty() {
            Err(AnalysisError::Config(format!("'{}' needs a character name", page.title())))
        } else {
            session.show(page, name, &mut out)
        };
        if let Err(e) = shown {
            let _ = render::error(&mut out, &e.to_string());
        }

        print!("\nPress [Enter] to go back to the menu.");
        let _ = out.flush();
        let mut pause = String::new();
        if stdin().read_line(&mut pause).is_err() {
            break;
        }
    }
}
