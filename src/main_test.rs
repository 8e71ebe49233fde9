use super::*;
use clap::CommandFactory;
use std::ffi::OsStr;

fn env_of(id: &str) -> Option<String> {
    let cmd = Cli::command();
    let arg = cmd.get_arguments().find(|a| a.get_id() == id).unwrap();
    arg.get_env().and_then(OsStr::to_str).map(str::to_owned)
}

#[test]
fn global_flags_read_their_environment_variables() {
    assert_eq!(env_of("api_url").as_deref(), Some("CARLOT_API_URL"));
    assert_eq!(env_of("storage_path").as_deref(), Some("CARLOT_STORAGE_PATH"));
}

#[test]
fn flags_parse_and_commands_pick_their_screen() {
    let cli = Cli::try_parse_from([
        "carlot",
        "--api-url",
        "http://api.test/api",
        "--storage-path",
        "/tmp/carlot.json",
        "cars",
        "update",
        "c1",
        "--anio",
        "2021",
    ])
    .unwrap();
    assert_eq!(cli.api_url.as_deref(), Some("http://api.test/api"));
    assert_eq!(cli.storage_path, Some(PathBuf::from("/tmp/carlot.json")));
    assert_eq!(cli.command.screen(), Some(Screen::CarEdit { id: "c1".into() }));

    let logout = Cli::try_parse_from(["carlot", "logout"]).unwrap();
    assert_eq!(logout.command.screen(), None);
}

#[test]
fn sort_flags_accept_wire_names_only() {
    let cli = Cli::try_parse_from(["carlot", "cars", "list", "--sort-by", "fechaAlta", "--sort-order", "desc"]).unwrap();
    let Command::Cars(CarsCommand { command: CarsSubcommand::List(args) }) = cli.command else {
        panic!("expected cars list");
    };
    assert_eq!(args.sort_by, Some(SortBy::FechaAlta));
    assert_eq!(args.sort_order, Some(SortOrder::Desc));

    assert!(Cli::try_parse_from(["carlot", "cars", "list", "--sort-by", "price"]).is_err());
}
