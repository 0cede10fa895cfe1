//! Pipeline-level guarantees
//!
//! These tests drive the whole generator and check what must hold for every run:
//! - one bad member never costs its siblings their fragments
//! - identical input gives byte-identical output, threaded or not
//! - marker spelling does not change the output

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};

    use crate::error::{GeneratorError, SkipReason};
    use crate::fixtures::{
        attr, attr_with, class, compilation, field, markers, method, namespace, property,
        sequential, tree,
    };
    use crate::generator::Generator;
    use crate::options::GeneratorOptions;
    use crate::semantic::{AttributeData, SemanticModel, SyntaxSemanticModel};
    use crate::syntax::{Compilation, FieldNode, SyntaxNode};

    fn player(members: Vec<SyntaxNode>) -> Compilation {
        compilation(vec![tree(
            "Player.cs",
            vec![namespace(
                "Game",
                vec![class("Player", &["public", "partial"], members)],
            )],
        )])
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // LOCAL FAILURES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_unmarked_members_produce_nothing() {
        let comp = player(vec![
            field("int", "hp", markers(&["SerializeField"])),
            field("Light", "lamp", markers(&["include-inactive"])),
        ]);
        let report = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        assert!(report.units.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_bad_members_are_skipped_siblings_survive() {
        let multi = SyntaxNode::Field(FieldNode {
            type_text: "Light".to_string(),
            variables: vec!["a".to_string(), "b".to_string()],
            modifiers: vec![],
            attributes: markers(&["get"]),
            location: Default::default(),
        });
        let readonly = SyntaxNode::Field(FieldNode {
            type_text: "Light".to_string(),
            variables: vec!["fixedLight".to_string()],
            modifiers: vec!["private".to_string(), "readonly".to_string()],
            attributes: markers(&["get"]),
            location: Default::default(),
        });
        let comp = player(vec![
            field("Rigidbody", "body", markers(&["get"])),
            multi,
            method("Init", markers(&["get"])),
            readonly,
            field("Light", "conflict", markers(&["get", "get-in-parent"])),
            field("Collider", "hitbox", markers(&["get"])),
        ]);

        let report = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        let unit = report.unit("Player_codegen").unwrap();
        assert_eq!(unit.fragment_count, 2);
        assert!(unit.text.contains("body = GetComponent<Rigidbody>();"));
        assert!(unit.text.contains("hitbox = GetComponent<Collider>();"));

        let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::MultipleVariables,
                SkipReason::UnsupportedMemberKind,
                SkipReason::NotAssignable,
                SkipReason::ConflictingStrategies,
            ]
        );
        assert_eq!(report.skipped[0].member.as_deref(), Some("a, b"));
        assert_eq!(report.skipped[0].code, "INJ003");
    }

    #[test]
    fn test_property_without_setter_is_skipped() {
        let mut getter_only = property("Camera", "Cam", markers(&["get"]));
        if let SyntaxNode::Property(p) = &mut getter_only {
            p.has_setter = false;
        }
        let comp = player(vec![getter_only]);
        let report = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        assert!(report.units.is_empty(), "all members skipped, no unit");
        assert_eq!(report.skipped[0].reason, SkipReason::NotAssignable);
    }

    #[test]
    fn test_unresolved_symbol_skips_only_that_member() {
        let model = |node: &SyntaxNode| -> Option<Vec<AttributeData>> {
            if node.display_name() == "ghost" {
                None
            } else {
                SyntaxSemanticModel.attributes(node)
            }
        };
        let comp = player(vec![
            field("Light", "ghost", markers(&["get"])),
            field("Light", "lamp", markers(&["get"])),
        ]);
        let report = sequential().generate(&comp, &model).unwrap();
        let unit = report.unit("Player_codegen").unwrap();
        assert_eq!(unit.fragment_count, 1);
        assert!(unit.text.contains("lamp = "));
        assert!(!unit.text.contains("ghost"));
        assert_eq!(report.skipped[0].reason, SkipReason::UnresolvedSymbol);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // PARAMETERS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_parameters_flow_from_attributes() {
        let comp = player(vec![
            field("Transform", "head", vec![attr_with("GetByName", &[(None, "\"Head\"")])]),
            field("Health", "boss", vec![attr_with("get-by-tag", &[(Some("tag"), "Boss")])]),
            field("AudioClip", "jump", vec![attr_with("GetInAssets", &[(Some("path"), "Sfx")])]),
        ]);
        let report = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        let text = &report.unit("Player_codegen").unwrap().text;

        assert!(text.contains("FirstOrDefault(c => c.name == \"Head\")"));
        assert!(text.contains("FirstOrDefault(c => c.CompareTag(\"Boss\"))"));
        // `path` is not the asset parameter key: falls back to an unnamed lookup
        assert!(text.contains("jump = Resources.FindObjectsOfTypeAll<AudioClip>().FirstOrDefault();"));
    }

    #[test]
    fn test_semantic_model_supplies_parameters() {
        let model = |node: &SyntaxNode| -> Option<Vec<AttributeData>> {
            match node.display_name().as_str() {
                "target" => Some(vec![AttributeData::new("GetByTag").with_argument("Enemy")]),
                _ => Some(vec![]),
            }
        };
        let comp = player(vec![field("Health", "target", vec![attr("GetByTag")])]);
        let report = sequential().generate(&comp, &model).unwrap();
        assert!(report.units[0].text.contains("c.CompareTag(\"Enemy\")"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DETERMINISM
    // ═══════════════════════════════════════════════════════════════════════════════

    fn many_types() -> Compilation {
        let classes = (0..24)
            .map(|i| {
                class(
                    &format!("Unit{}", i),
                    &["public", "partial"],
                    vec![
                        field("Rigidbody", "body", markers(&["get"])),
                        field("Collider[]", "hits", markers(&["get-in-children", "ignore-self"])),
                    ],
                )
            })
            .collect();
        compilation(vec![tree("Units.cs", vec![namespace("Game.Units", classes)])])
    }

    #[test]
    fn test_idempotent_and_parallel_matches_sequential() {
        let comp = many_types();
        let first = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        let second = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        let parallel = Generator::default()
            .generate(&comp, &SyntaxSemanticModel)
            .unwrap();

        assert_eq!(first.units, second.units);
        assert_eq!(first.units, parallel.units);
        let keys: Vec<String> = parallel.units.iter().map(|u| u.key.clone()).collect();
        let expected: Vec<String> = (0..24).map(|i| format!("Unit{}_codegen", i)).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_marker_spelling_does_not_change_output() {
        let render = |spelling: &str| {
            let comp = player(vec![field("Light", "lamp", markers(&[spelling]))]);
            sequential()
                .generate(&comp, &SyntaxSemanticModel)
                .unwrap()
                .units[0]
                .text
                .clone()
        };
        let canonical = render("get");
        for spelling in ["Get", " get ", "GET", "GetAttribute"] {
            assert_eq!(render(spelling), canonical, "spelling {:?}", spelling);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // OPTIONS, CANCELLATION, DIAGNOSTICS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_non_partial_generates_by_default() {
        let comp = compilation(vec![tree(
            "A.cs",
            vec![class("Whole", &["public"], vec![field("Light", "l", markers(&["get"]))])],
        )]);
        let report = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        assert!(report.unit("Whole_codegen").is_some());

        let strict = Generator::new(GeneratorOptions {
            require_partial: true,
            parallel: false,
            ..GeneratorOptions::default()
        });
        let report = strict.generate(&comp, &SyntaxSemanticModel).unwrap();
        assert!(report.units.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::NotPartial);
        assert!(report.skipped[0].member.is_none());
    }

    #[test]
    fn test_require_partial_checks_containing_types() {
        let comp = compilation(vec![tree(
            "A.cs",
            vec![class(
                "Outer",
                &["public"],
                vec![class("Inner", &["partial"], vec![field("Light", "l", markers(&["get"]))])],
            )],
        )]);
        let strict = Generator::new(GeneratorOptions {
            require_partial: true,
            parallel: false,
            ..GeneratorOptions::default()
        });
        let report = strict.generate(&comp, &SyntaxSemanticModel).unwrap();
        assert!(report.units.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::NotPartial);
        assert_eq!(report.skipped[0].type_name, "Inner");
    }

    #[test]
    fn test_collection_marker_option() {
        let comp = player(vec![field("IList<Light>", "lamps", markers(&["get"]))]);
        let default = sequential().generate(&comp, &SyntaxSemanticModel).unwrap();
        // "IList" contains "List", so the default marker already matches
        assert!(default.units[0].text.contains("GetComponents<Light>().ToList()"));

        let custom = Generator::new(GeneratorOptions {
            collection_marker: "Set".to_string(),
            parallel: false,
            ..GeneratorOptions::default()
        });
        let report = custom.generate(&comp, &SyntaxSemanticModel).unwrap();
        assert!(report.units[0].text.contains("lamps = GetComponent<IList<Light>>();"));
    }

    #[test]
    fn test_cancellation_between_candidates() {
        let cancel = AtomicBool::new(true);
        let result = sequential().generate_with_cancel(&many_types(), &SyntaxSemanticModel, &cancel);
        assert!(matches!(result, Err(GeneratorError::Cancelled)));

        let go = AtomicBool::new(false);
        let report = sequential()
            .generate_with_cancel(&many_types(), &SyntaxSemanticModel, &go)
            .unwrap();
        assert_eq!(report.units.len(), 24);
    }

    #[test]
    fn test_sink_receives_units_and_skips() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let captured = Arc::clone(&lines);
        let generator = sequential().with_sink(move |text: &str| {
            captured.lock().unwrap().push(text.to_string());
        });

        let comp = player(vec![
            field("Light", "lamp", markers(&["get"])),
            method("Init", markers(&["get"])),
        ]);
        generator.generate(&comp, &SyntaxSemanticModel).unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[INJ002] skipped Player.Init"));
        assert_eq!(lines[1], "generated Player_codegen (1 fragments, hook Awake)");
    }

    #[test]
    fn test_generate_from_json() {
        let input = json!({
            "trees": [{
                "filePath": "Assets/Turret.cs",
                "members": [
                    { "kind": "using", "name": "System" },
                    { "kind": "namespace", "name": "Game.Defense", "members": [{
                        "kind": "class",
                        "name": "Turret",
                        "modifiers": ["public", "partial"],
                        "members": [
                            { "kind": "field", "type": "Transform", "variables": ["barrel"],
                              "attributes": [{ "name": "GetByName", "arguments": [{ "value": "Barrel" }] }] },
                            { "kind": "property", "type": "List<Light>", "name": "Lights",
                              "attributes": [{ "name": "get-in-children" }, { "name": "skip-null-check" }] },
                            { "kind": "method", "name": "Fire", "attributes": [] }
                        ]
                    }]}
                ]
            }]
        });

        let report = crate::generate_from_json(&input.to_string(), Some(r#"{ "parallel": false }"#))
            .unwrap();
        let unit = report.unit("Turret_codegen").unwrap();
        assert_eq!(unit.namespace, "Game.Defense");
        assert!(unit.text.contains("using System;\n"));
        assert!(unit
            .text
            .contains("barrel = UnityEngine.Object.FindObjectsOfType<Transform>().FirstOrDefault(c => c.name == \"Barrel\");"));
        assert!(unit
            .text
            .contains("Lights = GetComponentsInChildren<Light>(false).ToList();\n"));
        assert!(!unit.text.contains("Lights == null"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = crate::generate_from_json("{ \"trees\": 3 }", None);
        assert!(matches!(result, Err(GeneratorError::InvalidInput(_))));
    }
}
