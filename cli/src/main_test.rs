use super::*;

#[test]
fn parses_defaults() {
    let cli = Cli::try_parse_from(["layout-cli", "load"]).unwrap();
    assert_eq!(cli.base_url, "http://127.0.0.1:3000");
    assert_eq!(cli.cache, PathBuf::from("./dws_app.json"));
    assert!(matches!(cli.command, Command::Load));
}

#[test]
fn parses_add_box_flags() {
    let cli = Cli::try_parse_from(["layout-cli", "add-box", "--size", "80", "--font-size", "20", "--save-remote"]).unwrap();
    let Command::AddBox(args) = cli.command else {
        panic!("expected add-box");
    };
    assert_eq!(args.size.as_deref(), Some("80"));
    assert_eq!(args.font_size.as_deref(), Some("20"));
    assert!(args.save_remote);
}

#[test]
fn save_requires_file() {
    assert!(Cli::try_parse_from(["layout-cli", "save"]).is_err());
}

#[test]
fn list_lines_numbers_boxes() {
    let mut core = EngineCore::new();
    core.add_box(1_000.0);
    core.add_box(1_000.0);
    let lines = list_lines(&core);
    assert_eq!(lines[0], "boxes 2/101");
    assert!(lines[1].starts_with("  1. Box 1 (200, 200) 60px"));
    assert!(lines[2].starts_with("  2. Box 2 (260, 200) 60px"));
}

#[test]
fn added_box_finds_first_addition() {
    let mut core = EngineCore::new();
    let actions = core.add_box(5.0);
    assert_eq!(added_box(&actions).map(|b| b.text.as_str()), Some("Box 1"));
    assert!(added_box(&[]).is_none());
}
