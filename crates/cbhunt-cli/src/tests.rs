use cbhunt_core::MissionConfig;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["cbhunt"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn search_defaults_to_deep_research_keywords() {
    let cli = Cli::try_parse_from(["cbhunt", "search", "喜茶"]).unwrap();
    let Some(Commands::Search { mission, run, select }) = cli.command else {
        panic!("expected search");
    };
    assert!(run.prompt_file.is_none());
    assert!(select.select.is_empty());
    assert!(!select.no_save);
    let MissionConfig::BrandSearch(config) = mission.to_config() else {
        panic!("expected brand search config");
    };
    assert_eq!(config.keywords[2], "喜茶 联名");
    assert_eq!(config.platforms.len(), 3);
}

#[test]
fn search_with_explicit_keywords_and_selection() {
    let cli = Cli::try_parse_from([
        "cbhunt",
        "search",
        "Nike",
        "--keyword",
        "Nike x Sacai",
        "--platform",
        "Xiaohongshu",
        "--select",
        "1,3",
        "--skip-duplicates",
        "--prompt-file",
        "edited.txt",
    ])
    .unwrap();
    let Some(Commands::Search { mission, run, select }) = cli.command else {
        panic!("expected search");
    };
    assert_eq!(select.select, vec![1, 3]);
    assert!(select.skip_duplicates);
    assert_eq!(run.prompt_file, Some(PathBuf::from("edited.txt")));
    let MissionConfig::BrandSearch(config) = mission.to_config() else {
        panic!("expected brand search config");
    };
    assert_eq!(config.keywords, vec!["Nike x Sacai".to_string()]);
    assert_eq!(config.platforms, vec!["Xiaohongshu".to_string()]);
}

#[test]
fn trends_defaults() {
    let cli = Cli::try_parse_from(["cbhunt", "trends", "潮玩"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trends {
            mission: TrendArgs { limit: 10, .. },
            no_save: false,
            research: None,
            ..
        })
    ));
}

#[test]
fn trends_research_conflicts_with_select() {
    let result =
        Cli::try_parse_from(["cbhunt", "trends", "潮玩", "--research", "2", "--select", "1"]);
    assert!(result.is_err());
}

#[test]
fn match_requires_industry_and_goal() {
    assert!(Cli::try_parse_from(["cbhunt", "match", "Oatly"]).is_err());
    let cli = Cli::try_parse_from([
        "cbhunt", "match", "Oatly", "--industry", "Food", "--goal", "Gen Z reach",
    ])
    .unwrap();
    let Some(Commands::Match { mission, .. }) = cli.command else {
        panic!("expected match");
    };
    assert!(mission.to_config().validate().is_ok());
}

#[test]
fn prompt_takes_a_mission_subcommand() {
    let cli = Cli::try_parse_from(["cbhunt", "prompt", "scout", "Chiikawa"]).unwrap();
    let Some(Commands::Prompt { mission }) = cli.command else {
        panic!("expected prompt");
    };
    assert!(matches!(mission.to_config(), MissionConfig::Scout(ref c) if c.ip_name == "Chiikawa"));
}

#[test]
fn collections_new_report() {
    let cli = Cli::try_parse_from(["cbhunt", "collections", "new", "Q3", "--report"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collections {
            command: CollectionsCommands::New {
                name: Some(ref n),
                report: true
            }
        }) if n == "Q3"
    ));
}

#[test]
fn collections_move_parses_positions() {
    let cli = Cli::try_parse_from(["cbhunt", "collections", "move", "2", "3", "1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collections {
            command: CollectionsCommands::Move { from: 3, to: 1, .. }
        })
    ));
}

#[test]
fn export_format_defaults_to_markdown() {
    let cli = Cli::try_parse_from(["cbhunt", "export", "1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            format: FormatArg::Markdown,
            output: None,
            ..
        })
    ));
    let cli = Cli::try_parse_from(["cbhunt", "export", "1", "--format", "mindmap", "-o", "a.md"])
        .unwrap();
    let Some(Commands::Export { format, .. }) = cli.command else {
        panic!("expected export");
    };
    assert_eq!(ExportFormat::from(format), ExportFormat::Mindmap);
}

#[test]
fn ideas_kind_is_validated() {
    assert!(Cli::try_parse_from(["cbhunt", "ideas", "brands", "咖啡"]).is_ok());
    assert!(Cli::try_parse_from(["cbhunt", "ideas", "movies", "咖啡"]).is_err());
}

#[test]
fn result_numbers_are_one_based() {
    assert_eq!(missions::to_indices(&[], 3).unwrap(), vec![0, 1, 2]);
    assert_eq!(missions::to_indices(&[3, 1], 3).unwrap(), vec![2, 0]);
    assert!(missions::to_indices(&[0], 3).is_err());
    assert!(missions::to_indices(&[4], 3).is_err());
}
