use skiff::{
    cmd::resolve::CommandResolver,
    history::{Direction, History},
    input::complete::{command_candidates, complete, Completion},
};

#[test]
fn history_survives_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("history");

    let mut first = History::default();
    first.add("echo one");
    first.add("   ");
    first.add("pwd");
    assert_eq!(first.append_to(&file).unwrap(), 2);

    let mut second = History::default();
    assert_eq!(second.load(&file).unwrap(), 2);
    second.add("cd /tmp");
    assert_eq!(second.append_to(&file).unwrap(), 1);
    assert_eq!(second.append_to(&file).unwrap(), 0);

    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "echo one\npwd\ncd /tmp\n"
    );

    assert_eq!(second.navigate(Direction::Up), "cd /tmp");
    assert_eq!(second.navigate(Direction::Up), "pwd");
    assert_eq!(second.navigate(Direction::Down), "cd /tmp");
    assert_eq!(second.navigate(Direction::Down), "");
}

#[test]
fn completes_executables_from_the_search_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    for name in ["skiff_tool_alpha", "skiff_tool_beta", "skiff_other"] {
        let path = dir.path().join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let resolver = CommandResolver::new(vec![dir.path().to_owned()]);
    let candidates = command_candidates(&resolver);

    assert_eq!(complete("skiff_o", &candidates), Completion::Insert("ther ".into()));
    assert_eq!(complete("skiff_t", &candidates), Completion::Insert("ool_".into()));
    assert_eq!(
        complete("skiff_tool_", &candidates),
        Completion::Ambiguous(vec!["skiff_tool_alpha".into(), "skiff_tool_beta".into()])
    );
    assert_eq!(complete("ty", &candidates), Completion::Insert("pe ".into()));
}
