use crate::helpers::{fixture_graph, match_lines, roots, Fixture, Line, OUTPUT_ROOT, ROOTS};
use textnotice::{
    format_text_notice, notice_sections, Category, LicenseTexts, NoticeError, RenderOptions,
};

use Category::{FirstParty, Notice, Proprietary, Reciprocal, Restricted};
use Line::{Library as Lib, Marker, Rule, UsedBy as Used};

fn render(fixture: Fixture, root_ids: &[&str]) -> String {
    let graph = fixture_graph(fixture);
    let sections = notice_sections(&graph, &roots(root_ids)).expect("resolution failed");
    format_text_notice(&sections, &RenderOptions::default(), &LicenseTexts::new())
}

struct Case {
    fixture: Fixture,
    name: &'static str,
    root: &'static str,
    expected: Vec<Line>,
}

fn case(fixture: Fixture, name: &'static str, root: &'static str, expected: Vec<Line>) -> Case {
    Case { fixture, name, root, expected }
}

fn apex_lines(category: Category) -> Vec<Line> {
    vec![
        Rule,
        Lib("Android"),
        Used("highest.apex"),
        Used("highest.apex/bin/bin1"),
        Used("highest.apex/bin/bin2"),
        Used("highest.apex/lib/libb.so"),
        Marker(FirstParty),
        Rule,
        Lib("Device"),
        Used("highest.apex/bin/bin1"),
        Used("highest.apex/lib/liba.so"),
        Lib("External"),
        Used("highest.apex/bin/bin1"),
        Marker(category),
    ]
}

fn container_lines(category: Category) -> Vec<Line> {
    vec![
        Rule,
        Lib("Android"),
        Used("container.zip"),
        Used("container.zip/bin1"),
        Used("container.zip/bin2"),
        Used("container.zip/libb.so"),
        Marker(FirstParty),
        Rule,
        Lib("Device"),
        Used("container.zip/bin1"),
        Used("container.zip/liba.so"),
        Lib("External"),
        Used("container.zip/bin1"),
        Marker(category),
    ]
}

fn single(library: &'static str, installed: &'static str, category: Category) -> Vec<Line> {
    vec![Rule, Lib(library), Used(installed), Marker(category)]
}

fn with_device(installed: &'static str, category: Category) -> Vec<Line> {
    let mut lines = single("Android", installed, FirstParty);
    lines.extend([Rule, Lib("Device"), Used(installed), Marker(category)]);
    lines
}

fn binary_lines(category: Category) -> Vec<Line> {
    vec![
        Rule,
        Lib("Android"),
        Used("bin/bin1"),
        Marker(FirstParty),
        Rule,
        Lib("Device"),
        Used("bin/bin1"),
        Lib("External"),
        Used("bin/bin1"),
        Marker(category),
    ]
}

fn golden_cases() -> Vec<Case> {
    let [apex, zip, application, bin1, libd] = ROOTS;

    vec![
        case(Fixture::FirstParty, "apex", apex, vec![
            Rule,
            Lib("Android"),
            Used("highest.apex"),
            Used("highest.apex/bin/bin1"),
            Used("highest.apex/bin/bin2"),
            Used("highest.apex/lib/liba.so"),
            Used("highest.apex/lib/libb.so"),
            Marker(FirstParty),
        ]),
        case(Fixture::FirstParty, "container", zip, vec![
            Rule,
            Lib("Android"),
            Used("container.zip"),
            Used("container.zip/bin1"),
            Used("container.zip/bin2"),
            Used("container.zip/liba.so"),
            Used("container.zip/libb.so"),
            Marker(FirstParty),
        ]),
        case(Fixture::FirstParty, "application", application, single("Android", "application", FirstParty)),
        case(Fixture::FirstParty, "binary", bin1, single("Android", "bin/bin1", FirstParty)),
        case(Fixture::FirstParty, "library", libd, single("Android", "lib/libd.so", FirstParty)),
        case(Fixture::Notice, "apex", apex, apex_lines(Notice)),
        case(Fixture::Notice, "container", zip, container_lines(Notice)),
        case(Fixture::Notice, "application", application, with_device("application", Notice)),
        case(Fixture::Notice, "binary", bin1, binary_lines(Notice)),
        case(Fixture::Notice, "library", libd, single("External", "lib/libd.so", Notice)),
        case(Fixture::Reciprocal, "apex", apex, apex_lines(Reciprocal)),
        case(Fixture::Reciprocal, "container", zip, container_lines(Reciprocal)),
        case(Fixture::Reciprocal, "application", application, with_device("application", Reciprocal)),
        case(Fixture::Reciprocal, "binary", bin1, binary_lines(Reciprocal)),
        case(Fixture::Reciprocal, "library", libd, single("External", "lib/libd.so", Notice)),
        case(Fixture::Restricted, "apex", apex, vec![
            Rule,
            Lib("Android"),
            Used("highest.apex"),
            Used("highest.apex/bin/bin1"),
            Used("highest.apex/bin/bin2"),
            Marker(FirstParty),
            Rule,
            Lib("Android"),
            Used("highest.apex/bin/bin2"),
            Used("highest.apex/lib/libb.so"),
            Lib("Device"),
            Used("highest.apex/bin/bin1"),
            Used("highest.apex/lib/liba.so"),
            Marker(Restricted),
            Rule,
            Lib("External"),
            Used("highest.apex/bin/bin1"),
            Marker(Reciprocal),
        ]),
        case(Fixture::Restricted, "container", zip, vec![
            Rule,
            Lib("Android"),
            Used("container.zip"),
            Used("container.zip/bin1"),
            Used("container.zip/bin2"),
            Marker(FirstParty),
            Rule,
            Lib("Android"),
            Used("container.zip/bin2"),
            Used("container.zip/libb.so"),
            Lib("Device"),
            Used("container.zip/bin1"),
            Used("container.zip/liba.so"),
            Marker(Restricted),
            Rule,
            Lib("External"),
            Used("container.zip/bin1"),
            Marker(Reciprocal),
        ]),
        case(Fixture::Restricted, "application", application, with_device("application", Restricted)),
        case(Fixture::Restricted, "binary", bin1, vec![
            Rule,
            Lib("Android"),
            Used("bin/bin1"),
            Marker(FirstParty),
            Rule,
            Lib("Device"),
            Used("bin/bin1"),
            Marker(Restricted),
            Rule,
            Lib("External"),
            Used("bin/bin1"),
            Marker(Reciprocal),
        ]),
        case(Fixture::Restricted, "library", libd, single("External", "lib/libd.so", Notice)),
        case(Fixture::Proprietary, "apex", apex, vec![
            Rule,
            Lib("Android"),
            Used("highest.apex/bin/bin2"),
            Used("highest.apex/lib/libb.so"),
            Marker(Restricted),
            Rule,
            Lib("Android"),
            Used("highest.apex"),
            Used("highest.apex/bin/bin1"),
            Marker(FirstParty),
            Rule,
            Lib("Android"),
            Used("highest.apex/bin/bin2"),
            Lib("Device"),
            Used("highest.apex/bin/bin1"),
            Used("highest.apex/lib/liba.so"),
            Lib("External"),
            Used("highest.apex/bin/bin1"),
            Marker(Proprietary),
        ]),
        case(Fixture::Proprietary, "container", zip, vec![
            Rule,
            Lib("Android"),
            Used("container.zip/bin2"),
            Used("container.zip/libb.so"),
            Marker(Restricted),
            Rule,
            Lib("Android"),
            Used("container.zip"),
            Used("container.zip/bin1"),
            Marker(FirstParty),
            Rule,
            Lib("Android"),
            Used("container.zip/bin2"),
            Lib("Device"),
            Used("container.zip/bin1"),
            Used("container.zip/liba.so"),
            Lib("External"),
            Used("container.zip/bin1"),
            Marker(Proprietary),
        ]),
        case(Fixture::Proprietary, "application", application, with_device("application", Proprietary)),
        case(Fixture::Proprietary, "binary", bin1, binary_lines(Proprietary)),
        case(Fixture::Proprietary, "library", libd, single("External", "lib/libd.so", Notice)),
    ]
}

#[test]
fn test_golden_notices() {
    let cases = golden_cases();
    assert_eq!(cases.len(), 25);

    let mut failures = Vec::new();
    for case in &cases {
        let output = render(case.fixture, &[case.root]);
        let errors = match_lines(&output, &case.expected);
        if !errors.is_empty() {
            failures.push(format!(
                "{:?} {}:\n  {}\ngot:\n{}",
                case.fixture,
                case.name,
                errors.join("\n  "),
                output
            ));
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn test_output_is_deterministic() {
    for fixture in Fixture::ALL {
        for root in ROOTS {
            let first = render(fixture, &[root]);
            for _ in 0..5 {
                assert_eq!(render(fixture, &[root]), first, "{:?} {}", fixture, root);
            }
        }
    }
}

#[test]
fn test_every_install_path_is_under_output_root() {
    for fixture in Fixture::ALL {
        let graph = fixture_graph(fixture);
        let sections = notice_sections(&graph, &roots(&ROOTS)).unwrap();

        for section in &sections {
            for block in &section.blocks {
                let mut seen = std::collections::HashSet::new();
                for install in &block.installs {
                    assert!(install.starts_with(OUTPUT_ROOT), "{}", install);
                    assert!(seen.insert(install), "duplicate {} in {}", install, block.library);
                }
            }
        }
    }
}

#[test]
fn test_build_tool_conditions_never_reach_the_notice() {
    for fixture in Fixture::ALL {
        let output = render(fixture, &["application.meta_lic"]);
        assert!(!output.contains("bin3"), "{:?}:\n{}", fixture, output);
    }
}

#[test]
fn test_dynamic_dependency_notice_attaches_to_binary() {
    let output = render(Fixture::Restricted, &["bin/bin2.meta_lic"]);
    let errors = match_lines(
        &output,
        &[
            Rule,
            Lib("Android"),
            Used("bin/bin2"),
            Marker(Restricted),
            Rule,
            Lib("Android"),
            Used("bin/bin2"),
            Marker(FirstParty),
        ],
    );
    assert!(errors.is_empty(), "{}\n{}", errors.join("\n"), output);
}

#[test]
fn test_shared_component_lists_every_root() {
    let graph = fixture_graph(Fixture::Restricted);
    let sections = notice_sections(
        &graph,
        &roots(&["highest.apex.meta_lic", "container.zip.meta_lic"]),
    )
    .unwrap();

    let restricted = sections
        .iter()
        .find(|s| s.category() == Restricted)
        .expect("restricted section");
    let android = restricted
        .blocks
        .iter()
        .find(|b| b.library == "Android")
        .expect("android block");

    let prefix = format!("{}/", OUTPUT_ROOT);
    let installs: Vec<&str> = android
        .installs
        .iter()
        .map(|p| p.strip_prefix(&prefix).unwrap_or(p))
        .collect();
    assert_eq!(
        installs,
        vec![
            "system/apex/highest.apex/bin/bin2",
            "system/apex/highest.apex/lib/libb.so",
            "data/container.zip/bin2",
            "data/container.zip/libb.so",
        ]
    );
}

#[test]
fn test_graph_without_conditions_renders_nothing() {
    let graph = fixture_graph(Fixture::Proprietary).without_conditions();
    let sections = notice_sections(&graph, &roots(&ROOTS)).unwrap();
    assert!(sections.is_empty());

    let output = format_text_notice(&sections, &RenderOptions::default(), &LicenseTexts::new());
    assert!(output.is_empty());
}

#[test]
fn test_strip_prefix_and_title() {
    let graph = fixture_graph(Fixture::FirstParty);
    let sections = notice_sections(&graph, &roots(&["bin/bin1.meta_lic"])).unwrap();
    let options = RenderOptions {
        title: Some("Notices for fictional".to_string()),
        strip_prefixes: vec![OUTPUT_ROOT.to_string()],
    };

    let output = format_text_notice(&sections, &options, &LicenseTexts::new());
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Notices for fictional"));
    assert!(output.contains("\n  system/bin/bin1\n"), "{}", output);
    assert!(!output.contains(OUTPUT_ROOT));
}

#[test]
fn test_unknown_root_is_rejected() {
    let graph = fixture_graph(Fixture::Notice);
    let err = notice_sections(&graph, &roots(&["nope.meta_lic"])).unwrap_err();
    assert!(matches!(err, NoticeError::RootNotFound(ref id) if id == "nope.meta_lic"));

    let err = notice_sections(&graph, &[]).unwrap_err();
    assert!(matches!(err, NoticeError::NoRoots));
}
