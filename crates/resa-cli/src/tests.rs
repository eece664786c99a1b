use super::*;
use resa_core::{AnalysisDepth, ModelProvider, SourceKind};

#[test]
fn parses_run_with_defaults() {
    let cli = Cli::try_parse_from(["resa", "run", "--topic", "Uniswap v4"])
        .expect("expected valid cli args");

    let Commands::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.topic, "Uniswap v4");
    assert_eq!(args.sources.kinds(), &SourceKind::ALL);
    assert_eq!(args.max_items, None);
    assert_eq!(args.depth, AnalysisDepth::Detailed);
    assert_eq!(args.model, ModelProvider::Claude);
    assert!(!args.strict);
    assert!(!args.interactive);
    assert!(args.output.is_none());
    assert!(args.compare_with.is_none());
    assert!(args.items_file.is_none());
}

#[test]
fn parses_run_with_all_options() {
    let cli = Cli::try_parse_from([
        "resa",
        "run",
        "--topic",
        "  Uniswap  ",
        "--sources",
        "web,x,web",
        "--max-items",
        "50",
        "--output",
        "weekly",
        "--depth",
        "quick",
        "--model",
        "gemini",
        "--strict",
        "--compare-with",
        "reports/last.md",
        "--items-file",
        "items.json",
        "--interactive",
    ])
    .expect("expected valid cli args");

    let Commands::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.topic, "Uniswap");
    assert_eq!(args.sources.kinds(), &[SourceKind::X, SourceKind::Web]);
    assert_eq!(args.max_items, Some(50));
    assert_eq!(args.output, Some(PathBuf::from("weekly")));
    assert_eq!(args.depth, AnalysisDepth::Quick);
    assert_eq!(args.model, ModelProvider::Gemini);
    assert!(args.strict);
    assert!(args.interactive);
    assert_eq!(args.compare_with, Some(PathBuf::from("reports/last.md")));
    assert_eq!(args.items_file, Some(PathBuf::from("items.json")));
}

#[test]
fn single_source_is_accepted() {
    let cli = Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--sources", "twitter"])
        .expect("expected valid cli args");
    let Commands::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.sources.kinds(), &[SourceKind::X]);
    assert_eq!(args.sources.labels(), "X");
}

#[test]
fn rejects_short_topic() {
    assert!(Cli::try_parse_from(["resa", "run", "--topic", " a "]).is_err());
}

#[test]
fn rejects_overlong_topic() {
    let topic = "t".repeat(201);
    assert!(Cli::try_parse_from(["resa", "run", "--topic", topic.as_str()]).is_err());
    let topic = "t".repeat(200);
    assert!(Cli::try_parse_from(["resa", "run", "--topic", topic.as_str()]).is_ok());
}

#[test]
fn rejects_out_of_range_max_items() {
    for value in ["0", "101", "-1", "many"] {
        assert!(
            Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--max-items", value])
                .is_err(),
            "{value} should be rejected"
        );
    }
    assert!(
        Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--max-items", "100"]).is_ok()
    );
}

#[test]
fn rejects_unknown_source_depth_and_model() {
    assert!(Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--sources", "reddit"]).is_err());
    assert!(Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--sources", ","]).is_err());
    assert!(Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--depth", "deep"]).is_err());
    assert!(Cli::try_parse_from(["resa", "run", "--topic", "hooks", "--model", "gpt"]).is_err());
}

#[test]
fn run_requires_topic() {
    assert!(Cli::try_parse_from(["resa", "run"]).is_err());
}

#[test]
fn parses_parse_command() {
    let cli = Cli::try_parse_from(["resa", "parse", "reports/a.md"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Parse { ref report } if report == &PathBuf::from("reports/a.md")
    ));
}

#[test]
fn parses_compare_command() {
    let cli = Cli::try_parse_from(["resa", "compare", "new.md", "old.md"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Compare { ref current, ref previous }
            if current == &PathBuf::from("new.md") && previous == &PathBuf::from("old.md")
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["resa"]).is_err());
}

#[test]
fn default_max_items_is_range_checked() {
    assert_eq!(args::check_max_items(20), Ok(20));
    assert!(args::check_max_items(0).is_err());
    assert!(args::check_max_items(250).is_err());
}
