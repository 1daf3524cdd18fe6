use std::fs;
use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use log::LevelFilter;
use miette::IntoDiagnostic;
use miette::WrapErr;
use rpn_calc::CalcError;

/// Exit status for an expression that failed to evaluate.
const EXIT_EXPRESSION_ERROR: i32 = 65;

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate arithmetic expressions")]
struct Args {
    /// Log what each stage does (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate an infix expression
    Eval {
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Print the tokens of an expression, one per line
    Tokenize {
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Print an expression in postfix order
    Postfix {
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Evaluate whitespace separated postfix tokens
    Rpn {
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Evaluate every non-blank line of a file
    File { filename: PathBuf },
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `RUST_LOG`, when set, overrides the level picked by `-v`.
fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let outcome = match args.command {
        Commands::Eval { expression } => {
            rpn_calc::calculate(&expression.join(" ")).map(|value| println!("{value}"))
        }
        Commands::Tokenize { expression } => {
            let expression = expression.join(" ");
            rpn_calc::tokenize(&expression).map(|tokens| {
                for token in tokens {
                    println!("{} {token}", token.name());
                }
                println!("EOF");
            })
        }
        Commands::Postfix { expression } => {
            let expression = expression.join(" ");
            rpn_calc::tokenize(&expression)
                .and_then(rpn_calc::to_postfix)
                .map(|postfix| println!("{}", rpn_calc::display_sequence(&postfix)))
        }
        Commands::Rpn { expression } => {
            rpn_calc::evaluate_str(&expression.join(" ")).map(|value| println!("{value}"))
        }
        Commands::File { filename } => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;
            let name = filename.display().to_string();

            let mut failed = false;
            for (index, line) in file_contents.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match rpn_calc::calculate_named(Some(&name), line) {
                    Ok(value) => println!("{value}"),
                    Err(e) => {
                        eprintln!("[line {}] Error: {e}", index + 1);
                        eprintln!("{:?}", miette::Report::new(e));
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(EXIT_EXPRESSION_ERROR);
            }
            Ok(())
        }
    };

    if let Err(e) = outcome {
        report(e);
    }
    Ok(())
}

fn report(e: CalcError) -> ! {
    eprintln!("Error: {e}");
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(EXIT_EXPRESSION_ERROR);
}
