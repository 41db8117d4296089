//! End-to-end parsing tests against on-disk Kconfig trees.
//!
//! `fixtures/tree` is a small kernel-shaped tree shared with the `ksym`
//! CLI tests; the other cases build throwaway trees in a temp directory.

use std::fs;
use std::path::PathBuf;

use ksym_kconfig::{
    BuildRules, DefaultKind, DiagnosticKind, KconfigError, KconfigParser, ParseOptions, RelationField, Severity,
    SymbolTable, TypeKind,
};
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tree")
}

fn parse_fixture() -> SymbolTable {
    KconfigParser::new(ParseOptions::new(fixture_dir()))
        .parse("Kconfig")
        .expect("fixture tree parses")
}

/// Writes `files` (path, contents) under a fresh temp directory.
fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn parse(dir: &TempDir) -> SymbolTable {
    KconfigParser::new(ParseOptions::new(dir.path())).parse("Kconfig").unwrap()
}

fn names(table: &SymbolTable) -> Vec<&str> {
    table.iter().map(|s| s.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Fixture tree
// ---------------------------------------------------------------------------

#[test]
fn fixture_files_are_visited_once_in_order() {
    let table = parse_fixture();
    assert_eq!(
        table.files(),
        [
            "Kconfig",
            "arch/x86/Kconfig",
            "net/Kconfig",
            "net/Kconfig.debug",
            "drivers/Kconfig",
            "drivers/net/Kconfig",
            "drivers/net/ethernet/Kconfig",
        ]
    );
    let tracker = table.get("NET_DEV_REFCNT_TRACKER").unwrap();
    assert_eq!(tracker.declaring_files, ["net/Kconfig.debug"]);
    assert_eq!(tracker.if_context(), ["NET"]);
}

#[test]
fn fixture_symbols() {
    let table = parse_fixture();
    assert_eq!(
        names(&table),
        [
            "DEFAULT_FQ_CODEL",
            "DEFAULT_PFIFO_FAST",
            "DUMMY",
            "E1000",
            "LOCALVERSION",
            "MMU",
            "NET",
            "NETDEVICES",
            "NET_DEV_REFCNT_TRACKER",
            "PACKET",
            "SWAP",
            "X86",
        ]
    );
}

#[test]
fn fixture_arch_file_follows_srcarch() {
    let table = parse_fixture();
    let x86 = table.get("CONFIG_X86").unwrap();
    assert_eq!(x86.select, ["ARCH_HAS_DEBUG_VIRTUAL", "GENERIC_IRQ_PROBE"]);
    assert_eq!(x86.imply, ["IRQ_REMAP"]);
    assert_eq!(x86.default_entries[0].kind, DefaultKind::DefBool);
    assert_eq!(x86.default_entries[0].expr, "y");
    assert!(table.get("ARM").is_none());

    let options = ParseOptions::new(fixture_dir()).arch("armhf");
    let table = KconfigParser::new(options).parse("Kconfig").unwrap();
    assert!(table.get("X86").is_none());
    let arm = table.get("ARM").unwrap();
    assert_eq!(arm.type_entries[0].kind, TypeKind::Bool);
    assert_eq!(arm.type_entries[0].rest, None);
    assert_eq!(table.files()[1], "arch/arm/Kconfig");
}

#[test]
fn fixture_menus_nest_under_mainmenu() {
    let table = parse_fixture();
    let titles = |name: &str| -> Vec<String> {
        table
            .get(name)
            .unwrap()
            .menu_context()
            .iter()
            .map(|m| m.title.clone())
            .collect()
    };
    assert_eq!(titles("SWAP"), ["Linux Kernel Configuration", "General setup"]);
    assert_eq!(titles("NET"), ["Linux Kernel Configuration"]);
    assert_eq!(titles("E1000"), ["Linux Kernel Configuration", "Device Drivers"]);

    assert!(
        table.diagnostics().iter().all(|d| d.severity == Severity::Debug),
        "{:?}",
        table.diagnostics()
    );
}

#[test]
fn fixture_help_text() {
    let table = parse_fixture();
    assert_eq!(
        table.get("LOCALVERSION").unwrap().help,
        [
            "Append an extra string to the end of your kernel version.",
            "",
            "The string you set here will be appended.",
        ]
    );
    assert_eq!(
        table.get("PACKET").unwrap().help,
        [
            "The Packet protocol is used by applications which communicate",
            "directly with network devices.",
            "",
            "  Indented example line.",
            "",
            "To compile this driver as a module, choose M here.",
        ]
    );
}

#[test]
fn fixture_continuation_joins_expression() {
    let table = parse_fixture();
    let e1000 = table.get("E1000").unwrap();
    assert_eq!(e1000.depends_on, ["PCI && (NETDEVICES || COMPILE_TEST)"]);
    assert_eq!(e1000.declaring_files, ["drivers/net/ethernet/Kconfig"]);
    assert_eq!(e1000.if_context(), ["NETDEVICES"]);
}

#[test]
fn fixture_choice_members() {
    let table = parse_fixture();
    let codel = table.get("DEFAULT_FQ_CODEL").unwrap();
    assert_eq!(codel.choice_context().len(), 1);
    let choice = &codel.choice_context()[0];
    assert_eq!(choice.prompt, "Default qdisc");
    assert_eq!(choice.default, ["DEFAULT_FQ_CODEL"]);
    assert_eq!(choice.name, None);
    assert!(codel.help.is_empty());

    assert!(table.get("DUMMY").unwrap().choice_context().is_empty());
    assert_eq!(table.get("DUMMY").unwrap().help, ["This is essentially a bit-bucket device."]);
}

#[test]
fn fixture_property_order_is_free() {
    let table = parse_fixture();
    let netdev = table.get("NETDEVICES").unwrap();
    assert_eq!(netdev.default_entries[0].expr, "y if UML");
    assert_eq!(netdev.depends_on, ["NET"]);
    assert_eq!(netdev.type_entries[0].kind, TypeKind::Bool);
    assert_eq!(netdev.type_entries[0].rest.as_deref(), Some("\"Network device support\""));
}

#[test]
fn fixture_missing_optional_source_is_noted() {
    let table = parse_fixture();
    let missing: Vec<_> = table
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::MissingOptionalSource)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].file, "drivers/net/Kconfig");
}

#[test]
fn fixture_search() {
    let table = parse_fixture();
    let hits: Vec<_> = table
        .search(RelationField::DependsOn, &["NET"])
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(hits, ["NETDEVICES", "NET_DEV_REFCNT_TRACKER"]);

    let selectors: Vec<_> = table.selected_by("CONFIG_CRC32").into_iter().map(|s| s.name.as_str()).collect();
    assert_eq!(selectors, ["E1000"]);
}

#[test]
fn fixture_build_rules() {
    let rules = BuildRules::scan(&fixture_dir()).unwrap();
    assert_eq!(rules.symbol_to_artifacts("PACKET"), ["net/packet/", "net/packet/af_packet.ko"]);
    assert_eq!(rules.artifact_to_symbol("e1000.ko"), Some("E1000"));
    assert_eq!(rules.artifact_to_symbol("af_packet"), Some("PACKET"));
    assert_eq!(rules.artifact_to_symbol("nothing"), None);
}

#[test]
fn fixture_serializes_to_json() {
    let table = parse_fixture();
    let value = serde_json::to_value(&table).unwrap();
    assert_eq!(value["symbols"]["PACKET"]["if_context"][0], "NET");
    assert_eq!(value["symbols"]["NET"]["select"][2], "BPF");
    assert_eq!(value["files"][0], "Kconfig");
}

// ---------------------------------------------------------------------------
// Temp trees
// ---------------------------------------------------------------------------

#[test]
fn net_scenario() {
    let dir = tree(&[(
        "Kconfig",
        "config NET\n\tbool \"Networking support\"\n\tselect NLATTR\n\thelp\n\t  Unless you know\n\t  say Y.\n\nif NET\nconfig PACKET\n\ttristate\nendif\n",
    )]);
    let table = parse(&dir);

    let net = table.get("NET").unwrap();
    assert_eq!(net.declaring_files, ["Kconfig"]);
    assert_eq!(net.select, ["NLATTR"]);
    assert_eq!(net.help, ["Unless you know", "say Y."]);
    assert_eq!(net.type_entries[0].rest.as_deref(), Some("\"Networking support\""));
    assert!(net.if_context().is_empty());

    let packet = table.get("PACKET").unwrap();
    assert_eq!(packet.if_context(), ["NET"]);
    assert_eq!(packet.type_entries[0].kind, TypeKind::Tristate);
    assert!(table.diagnostics().is_empty(), "{:?}", table.diagnostics());
}

#[test]
fn diamond_and_cyclic_sources_load_once() {
    let dir = tree(&[
        ("Kconfig", "source \"a/Kconfig\"\nsource \"b/Kconfig\"\n"),
        ("a/Kconfig", "source \"c/Kconfig\"\nsource \"Kconfig\"\n"),
        ("b/Kconfig", "source \"./c/../c/Kconfig\"\n"),
        ("c/Kconfig", "config SHARED\n\tbool\n"),
    ]);
    let table = parse(&dir);
    assert_eq!(table.files(), ["Kconfig", "a/Kconfig", "c/Kconfig", "b/Kconfig"]);
    assert_eq!(table.get("SHARED").unwrap().declaring_files, ["c/Kconfig"]);
}

#[test]
fn help_indent_fixed_by_first_line() {
    let dir = tree(&[(
        "Kconfig",
        "config FOO\n  help\n      line one\n        line two\n\n      line three\n\n\n",
    )]);
    let table = parse(&dir);
    assert_eq!(table.get("FOO").unwrap().help, ["line one", "  line two", "", "line three"]);
}

#[test]
fn help_ends_on_shallower_line() {
    let dir = tree(&[(
        "Kconfig",
        "config FOO\n\thelp\n\t  text\n\tselect BAR\n",
    )]);
    let table = parse(&dir);
    let foo = table.get("FOO").unwrap();
    assert_eq!(foo.help, ["text"]);
    assert_eq!(foo.select, ["BAR"]);
}

#[test]
fn snapshot_taken_at_first_declaration() {
    let dir = tree(&[(
        "Kconfig",
        "menu \"M1\"\nconfig A\n\tbool\nendmenu\nmenu \"M2\"\nconfig A\n\tselect X\nconfig B\n\tbool\nendmenu\n",
    )]);
    let table = parse(&dir);
    let a = table.get("A").unwrap();
    assert_eq!(a.menu_context().len(), 1);
    assert_eq!(a.menu_context()[0].title, "M1");
    assert_eq!(a.declaring_files, ["Kconfig", "Kconfig"]);
    assert_eq!(a.select, ["X"]);
    assert_eq!(table.get("B").unwrap().menu_context()[0].title, "M2");
}

#[test]
fn later_menu_conditions_do_not_leak_into_snapshots() {
    let dir = tree(&[(
        "Kconfig",
        "menu \"Top\"\n\tdepends on EARLY\n\tvisible if SHOWN\nconfig A\n\tbool\nendmenu\n",
    )]);
    let table = parse(&dir);
    let menu = &table.get("A").unwrap().menu_context()[0];
    assert_eq!(menu.depends_on, ["EARLY"]);
    assert_eq!(menu.visible_if, ["SHOWN"]);
}

#[test]
fn repeated_entries_are_kept() {
    let dir = tree(&[(
        "Kconfig",
        "config FOO\n\tselect X\n\tselect X\n\tselect Y\n",
    )]);
    assert_eq!(parse(&dir).get("FOO").unwrap().select, ["X", "X", "Y"]);
}

#[test]
fn comment_conditions_are_dropped() {
    let dir = tree(&[(
        "Kconfig",
        "config FOO\n\tbool\ncomment \"Notes\"\n\tdepends on BAR\n",
    )]);
    let table = parse(&dir);
    assert!(table.get("FOO").unwrap().depends_on.is_empty());
    assert!(table.diagnostics().is_empty());
}

#[test]
fn unbalanced_endif_warns_by_default() {
    let dir = tree(&[("Kconfig", "config FOO\n\tbool\nendif\nconfig BAR\n\tbool\n")]);
    let table = parse(&dir);
    assert_eq!(names(&table), ["BAR", "FOO"]);

    let warning = &table.diagnostics()[0];
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.kind, DiagnosticKind::Unbalanced);
    assert_eq!(warning.line, Some(3));
}

#[test]
fn unbalanced_endif_fails_in_strict_mode() {
    let dir = tree(&[("Kconfig", "config FOO\n\tbool\nendif\n")]);
    let err = KconfigParser::new(ParseOptions::new(dir.path()).strict_balance(true))
        .parse("Kconfig")
        .unwrap_err();
    assert!(
        matches!(err, KconfigError::Unbalanced { line: 3, directive: "endif", .. }),
        "{err}"
    );
}

#[test]
fn unclosed_scopes_warn() {
    let dir = tree(&[("Kconfig", "if FOO\nmenu \"Open\"\n")]);
    let table = parse(&dir);
    assert!(
        table
            .diagnostics()
            .iter()
            .any(|d| d.kind == DiagnosticKind::Unclosed && d.severity == Severity::Warning)
    );
}

#[test]
fn missing_source_is_fatal() {
    let dir = tree(&[("Kconfig", "config FOO\n\tbool\nsource \"nope/Kconfig\"\n")]);
    let err = KconfigParser::new(ParseOptions::new(dir.path())).parse("Kconfig").unwrap_err();
    match err {
        KconfigError::Io { path, .. } => assert!(path.ends_with("nope/Kconfig")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_root_is_fatal() {
    let dir = tree(&[]);
    let result = KconfigParser::new(ParseOptions::new(dir.path())).parse("Kconfig");
    assert!(matches!(result, Err(KconfigError::Io { .. })));
}

#[test]
fn relative_and_optional_sources() {
    let dir = tree(&[
        ("Kconfig", "source \"sub/Kconfig\"\nosource \"absent/Kconfig\"\n"),
        ("sub/Kconfig", "rsource \"inner/Kconfig\"\norsource \"gone/Kconfig\"\n"),
        ("sub/inner/Kconfig", "config INNER\n\tbool\n"),
    ]);
    let table = parse(&dir);
    assert_eq!(table.files(), ["Kconfig", "sub/Kconfig", "sub/inner/Kconfig"]);
    assert!(table.get("INNER").is_some());
    let optional = table
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::MissingOptionalSource)
        .count();
    assert_eq!(optional, 2);
}

#[test]
fn indented_source_warns_and_is_followed() {
    let dir = tree(&[
        ("Kconfig", "  source \"sub/Kconfig\"\n"),
        ("sub/Kconfig", "config SUB\n\tbool\n"),
    ]);
    let table = parse(&dir);
    assert!(table.get("SUB").is_some());
    assert_eq!(table.diagnostics()[0].kind, DiagnosticKind::IndentedSource);
    assert_eq!(table.diagnostics()[0].severity, Severity::Warning);
}

#[test]
fn file_boundary_closes_symbol() {
    let dir = tree(&[
        ("Kconfig", "config FOO\n\tbool\nsource \"sub/Kconfig\"\n\tselect LATE\n"),
        ("sub/Kconfig", "\tselect ORPHAN\n"),
    ]);
    let table = parse(&dir);
    assert!(table.get("FOO").unwrap().select.is_empty());
    let orphans = table
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::NoOpenDeclaration)
        .count();
    assert_eq!(orphans, 2);
}

#[test]
fn end_to_end_net_symbol() {
    let dir = tree(&[(
        "Kconfig",
        "config NET\n\tbool \"Networking\"\n\tdepends on !M\n\thelp\n\t  Enable the network stack.\n\n",
    )]);
    let table = parse(&dir);
    assert_eq!(names(&table), ["NET"]);

    let net = table.get("NET").unwrap();
    assert_eq!(net.type_entries.len(), 1);
    assert_eq!(net.type_entries[0].kind, TypeKind::Bool);
    assert_eq!(net.type_entries[0].rest.as_deref(), Some("\"Networking\""));
    assert_eq!(net.depends_on, ["!M"]);
    assert_eq!(net.help, ["Enable the network stack."]);
    assert!(!net.menuconfig);
}

#[test]
fn choice_scope_fields() {
    let dir = tree(&[(
        "Kconfig",
        "choice\n\tprompt \"One\"\n\tprompt \"Two\"\n\tbool\n\tdepends on X\n\tdefault A\n\thelp\n\t  Choice help.\n\nconfig A\n\tbool \"A\"\nendchoice\n",
    )]);
    let table = parse(&dir);
    let a = table.get("A").unwrap();
    assert!(a.help.is_empty());

    let choice = &a.choice_context()[0];
    assert_eq!(choice.prompt, "Two");
    assert_eq!(choice.depends_on, ["X"]);
    assert_eq!(choice.default, ["A"]);
    assert_eq!(choice.type_entries.len(), 1);
    assert_eq!(choice.type_entries[0].kind, TypeKind::Bool);
    assert_eq!(choice.type_entries[0].rest, None);
    assert!(a.prompt.is_empty());
}

#[test]
fn menuconfig_is_flagged() {
    let table = parse_fixture();
    assert!(table.get("NET").unwrap().menuconfig);
    assert!(!table.get("PACKET").unwrap().menuconfig);
}

#[test]
fn unbalanced_endmenu_and_endchoice() {
    for closer in ["endmenu", "endchoice"] {
        let source = format!("config FOO\n\tbool\n{closer}\n");
        let dir = tree(&[("Kconfig", source.as_str())]);
        let table = parse(&dir);
        let warning = &table.diagnostics()[0];
        assert_eq!(warning.kind, DiagnosticKind::Unbalanced, "{closer}");
        assert_eq!(warning.line, Some(3), "{closer}");

        let err = KconfigParser::new(ParseOptions::new(dir.path()).strict_balance(true))
            .parse("Kconfig")
            .unwrap_err();
        match err {
            KconfigError::Unbalanced { directive, .. } => assert_eq!(directive, closer),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn closed_mainmenu_does_not_mask_open_menu() {
    let dir = tree(&[("Kconfig", "mainmenu \"Top\"\nendmenu\nmenu \"Open\"\nconfig FOO\n\tbool\n")]);
    let table = parse(&dir);
    let unclosed: Vec<_> = table
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Unclosed)
        .collect();
    assert_eq!(unclosed.len(), 1);
    assert!(unclosed[0].message.contains("1 menu"), "{}", unclosed[0].message);
}

#[test]
fn open_mainmenu_is_not_unclosed() {
    let dir = tree(&[("Kconfig", "mainmenu \"Top\"\nconfig FOO\n\tbool\n")]);
    let table = parse(&dir);
    assert!(table.diagnostics().is_empty(), "{:?}", table.diagnostics());
    assert_eq!(table.get("FOO").unwrap().menu_context()[0].title, "Top");
}

#[test]
fn parent_directory_runs_resolve_outside_the_root() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("a/root");
    let files = [
        (root.join("Kconfig"), "source \"../../x/Kconfig\"\n"),
        (root.join("x/Kconfig"), "config WRONG\n\tbool\n"),
        (outer.path().join("x/Kconfig"), "config RIGHT\n\tbool\n"),
    ];
    for (path, contents) in &files {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    let table = KconfigParser::new(ParseOptions::new(&root)).parse("Kconfig").unwrap();
    assert!(table.get("RIGHT").is_some());
    assert!(table.get("WRONG").is_none());
    assert_eq!(table.files(), ["Kconfig", "../../x/Kconfig"]);
}
