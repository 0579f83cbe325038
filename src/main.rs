use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use engagement_engine::thread::ComposeOptions;
use engagement_engine::{
    format_float, format_percent, to_unit_scale, AlgorithmSignal, Engine, EngineConfig,
    OptimizationReport, PostAnalysis, SubScore, ThreadAnalysis, ThreadPart, MAX_POST_LENGTH,
};

const PART_SEPARATOR: &str = "---";

#[derive(Parser)]
#[command(name = "engagement-engine", about = "Post engagement analyzer")]
struct Cli {
    /// TOML file with scoring tables; falls back to ENGINE_CONFIG_PATH.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Analyze(AnalyzeArgs),
    Compose(ComposeArgs),
    ScoreThread(ScoreThreadArgs),
    Compare(CompareArgs),
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    media: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct ComposeArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long, default_value_t = 5)]
    max_parts: usize,
    #[arg(long)]
    hook: bool,
    #[arg(long)]
    cta: bool,
    /// Seed for closing call-to-action selection instead of the content hash.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct ScoreThreadArgs {
    /// JSON array of parts, or plain text with parts separated by `---` lines.
    /// Reads stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct CompareArgs {
    #[arg(long)]
    original: String,
    #[arg(long)]
    optimized: String,
    #[arg(long)]
    media: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Writes the default tables to `path`.
    Init { path: PathBuf },
}

fn main() {
    load_dotenv();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    init_tracing()?;
    let cli = Cli::parse();

    if let Command::Config(ConfigCommand::Init { path }) = &cli.command {
        return write_default_config(path);
    }

    let (config, source) = EngineConfig::load(cli.config).map_err(|err| err.to_string())?;
    if let Some(path) = source.filter(|path| path.exists()) {
        info!(path = %path.display(), "loaded engine config");
    }

    match cli.command {
        Command::Analyze(args) => run_analyze(config, args),
        Command::Compose(args) => run_compose(config, args),
        Command::ScoreThread(args) => run_score_thread(config, args),
        Command::Compare(args) => run_compare(config, args),
        Command::Config(_) => Ok(()),
    }
}

fn run_analyze(config: EngineConfig, args: AnalyzeArgs) -> Result<(), String> {
    let engine = Engine::new(config).map_err(|err| err.to_string())?;
    let text = read_text(args.text)?;
    let analysis = engine.analyze(&text, args.media);

    if args.json {
        return print_json(&analysis);
    }
    print_analysis(&analysis);
    Ok(())
}

fn run_compose(mut config: EngineConfig, args: ComposeArgs) -> Result<(), String> {
    if args.max_parts == 0 {
        return Err("--max-parts must be at least 1".to_string());
    }
    if args.seed.is_some() {
        config.thread.cta_seed = args.seed;
    }
    let engine = Engine::new(config).map_err(|err| err.to_string())?;
    let text = read_text(args.text)?;
    let options = ComposeOptions {
        max_parts: args.max_parts,
        add_hook: args.hook,
        add_cta: args.cta,
    };
    let parts = engine.compose(&text, &options);
    let analysis = engine.score_thread(&parts);

    if args.json {
        return print_json(&serde_json::json!({
            "parts": parts,
            "analysis": analysis,
        }));
    }

    let total = parts.len();
    for (index, part) in parts.iter().enumerate() {
        println!(
            "{}/{} ({} chars)\n{}\n",
            index + 1,
            total,
            part.char_count(),
            part.content
        );
    }
    print_thread_analysis(&analysis);
    Ok(())
}

fn run_score_thread(config: EngineConfig, args: ScoreThreadArgs) -> Result<(), String> {
    let engine = Engine::new(config).map_err(|err| err.to_string())?;
    let raw = match args.file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|err| format!("failed reading {}: {}", path.display(), err))?,
        None => read_stdin()?,
    };
    let parts = parse_parts(&raw)?;
    let analysis = engine.score_thread(&parts);

    if args.json {
        return print_json(&analysis);
    }
    print_thread_analysis(&analysis);
    Ok(())
}

fn run_compare(config: EngineConfig, args: CompareArgs) -> Result<(), String> {
    let engine = Engine::new(config).map_err(|err| err.to_string())?;
    let report = engine.compare(&args.original, &args.optimized, args.media);

    if args.json {
        return print_json(&report);
    }
    print_comparison(&report);
    Ok(())
}

fn write_default_config(path: &Path) -> Result<(), String> {
    EngineConfig::default()
        .write(path)
        .map_err(|err| err.to_string())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn print_analysis(analysis: &PostAnalysis) {
    let scores = &analysis.engagement_scores;
    let metrics = &analysis.content_metrics;

    println!(
        "Overall score: {} / 100 ({})",
        format_float(scores.overall_score, 1),
        format_percent(to_unit_scale(scores.overall_score))
    );
    for sub_score in SubScore::ALL {
        println!("  {}: {}", sub_score.label(), format_float(scores.get(sub_score), 1));
    }
    println!(
        "Length: {} chars | {} words | {} sentences | ~{}s read",
        metrics.character_count,
        metrics.word_count,
        metrics.sentence_count,
        metrics.reading_time_seconds
    );
    println!(
        "Counts: hashtags {} | mentions {} | links {} | emojis {}",
        metrics.hashtag_count, metrics.mention_count, metrics.link_count, metrics.emoji_count
    );

    println!("Positive signals: {}", signal_names(&analysis.signals.positive));
    println!("Negative signals: {}", signal_names(&analysis.signals.negative));
    println!("Neutral signals: {}", signal_names(&analysis.signals.neutral));

    if !analysis.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &analysis.warnings {
            println!(
                "- [{}] {} ({})",
                warning.severity.label(),
                warning.message,
                format_float(warning.score_impact, 0)
            );
        }
    }

    if !analysis.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &analysis.suggestions {
            println!(
                "- [{}] {} (+{})",
                suggestion.priority.label(),
                suggestion.message,
                format_float(suggestion.potential_score_increase, 0)
            );
            if let Some(action) = &suggestion.action {
                println!("    {}", action);
            }
        }
    }
}

fn signal_names(signals: &[AlgorithmSignal]) -> String {
    if signals.is_empty() {
        return "none".to_string();
    }
    signals
        .iter()
        .map(|signal| signal.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_thread_analysis(analysis: &ThreadAnalysis) {
    println!("Thread score: {}", format_float(analysis.total_score, 0));
    println!(
        "Hook {} | flow {} | CTA {}",
        format_float(analysis.hook_strength, 0),
        format_float(analysis.flow_score, 0),
        format_float(analysis.cta_effectiveness, 0)
    );
    for (index, part) in analysis.part_scores.iter().enumerate() {
        println!("  part {}: {}", index + 1, format_float(part.score, 0));
    }
    if !analysis.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &analysis.suggestions {
            println!("- {}", suggestion);
        }
    }
}

fn print_comparison(report: &OptimizationReport) {
    println!(
        "Original: {} | Optimized: {} | Delta: {}",
        format_float(report.original.engagement_scores.overall_score, 1),
        format_float(report.optimized.engagement_scores.overall_score, 1),
        format_float(report.score_delta, 1)
    );
    if report.improvements.is_empty() {
        println!("No measurable improvements.");
        return;
    }
    println!("\nImprovements:");
    for improvement in &report.improvements {
        println!("- {}", improvement);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed encoding json: {}", err))?;
    println!("{}", payload);
    Ok(())
}

/// Accepts a JSON array of `{id, content}` objects or of plain strings, then
/// falls back to `---`-separated text.
fn parse_parts(raw: &str) -> Result<Vec<ThreadPart>, String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(parts) = serde_json::from_str::<Vec<ThreadPart>>(trimmed) {
            return Ok(parts);
        }
        let texts: Vec<String> = serde_json::from_str(trimmed)
            .map_err(|err| format!("invalid thread json: {}", err))?;
        return Ok(numbered_parts(texts));
    }

    let texts: Vec<String> = trimmed
        .split(&format!("\n{}\n", PART_SEPARATOR))
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if texts.is_empty() {
        return Err("missing thread parts: pass --file or pipe stdin".to_string());
    }
    let over = texts
        .iter()
        .filter(|text| text.chars().count() > MAX_POST_LENGTH)
        .count();
    if over > 0 {
        warn!(over, "some parts exceed the post length limit");
    }
    Ok(numbered_parts(texts))
}

fn numbered_parts(texts: Vec<String>) -> Vec<ThreadPart> {
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| ThreadPart::new(format!("part_{}", index + 1), text))
        .collect()
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }
    let text = read_stdin()?;
    if text.is_empty() {
        return Err("missing post text: pass --text or pipe stdin".to_string());
    }
    Ok(text)
}

fn read_stdin() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    Ok(buffer.trim().to_string())
}

fn init_tracing() -> Result<(), String> {
    let directive = "engagement_engine=info"
        .parse::<Directive>()
        .map_err(|err| format!("invalid log directive: {}", err))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separated_text() {
        let parts = parse_parts("First part here.\n---\nSecond part here.\n").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].id, "part_1");
        assert_eq!(parts[1].content, "Second part here.");
    }

    #[test]
    fn parses_json_objects_and_strings() {
        let parts = parse_parts(r#"[{"id": "a", "content": "one"}]"#).unwrap();
        assert_eq!(parts[0].id, "a");

        let parts = parse_parts(r#"["one", "two"]"#).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].id, "part_2");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_parts("  ").is_err());
    }
}
