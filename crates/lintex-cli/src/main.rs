use clap::{Parser, Subcommand};
use lintex_analysis::{analyze, Analysis};
use lintex_syntax::{SyntaxTree, Tokenizer};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lintex")]
#[command(about = "Structural analysis for LaTeX documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a document and report diagnostics and statistics
    Check {
        /// Path to the .tex file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Emit the full analysis bundle as JSON
        #[arg(long)]
        json: bool,
    },
    /// Emit the classified token stream as JSON
    Tokens {
        /// Path to the .tex file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Print the syntax tree
    Tree {
        /// Path to the .tex file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Check { path, json } => {
            let text = fs::read_to_string(path)?;
            let analysis = analyze(&text);
            if *json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_report(&analysis);
            }
        }
        Commands::Tokens { path } => {
            let text = fs::read_to_string(path)?;
            let tokens: Vec<_> = Tokenizer::new(&text).collect();
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        Commands::Tree { path } => {
            let text = fs::read_to_string(path)?;
            print!("{}", SyntaxTree::build(&text).render());
        }
    }
    Ok(())
}

fn print_report(analysis: &Analysis) {
    for diagnostic in &analysis.diagnostics {
        println!("line {}: {}", diagnostic.line, diagnostic.message);
        if let Some(explanation) = &diagnostic.explanation {
            println!("    {}", explanation);
        }
        if let Some(suggestion) = &diagnostic.suggestion {
            for line in suggestion.lines() {
                println!("    | {}", line);
            }
        }
    }

    let stats = &analysis.statistics;
    println!(
        "{} diagnostics; {} lines, {} commands, {} math expressions, {} environments, {} comments, max depth {}",
        analysis.diagnostics.len(),
        stats.total_lines,
        stats.total_commands,
        stats.total_math_expressions,
        stats.total_environments,
        stats.total_comments,
        stats.max_nesting_depth
    );
}
